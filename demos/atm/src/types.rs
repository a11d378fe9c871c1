//! Domain types for the ATM demo.
//!
//! A single account balance, a ledger of transactions, and the closed set
//! of actions that drive both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a ledger transaction
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random `TransactionId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TransactionId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a ledger transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money entering the account (successful deposit)
    Income,
    /// Money leaving the account (successful withdrawal)
    Expense,
}

/// A recorded movement on the account balance
///
/// Created only by the reducer applying a validated deposit or withdrawal;
/// removed only by an explicit `RemoveTransaction` action, which also
/// reverses its balance effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier, unique across the ledger
    pub id: TransactionId,
    /// Amount moved, always non-negative
    pub amount: u64,
    /// Whether the amount was added or subtracted
    pub kind: TransactionKind,
    /// Human-readable description
    pub description: String,
    /// When the transaction was recorded
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new transaction
    #[must_use]
    pub const fn new(
        id: TransactionId,
        amount: u64,
        kind: TransactionKind,
        description: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            amount,
            kind,
            description,
            created_at,
        }
    }
}

/// State of the ATM account
///
/// Replaced wholesale by the store on every reduction; observers only ever
/// see published snapshots. Under correct operation at most one of `error`
/// and `loading` is true at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtmState {
    /// Current account balance
    ///
    /// Signed: withdrawals are not floored, so the balance may go negative.
    pub balance: i64,
    /// Ordered ledger of recorded transactions
    pub transactions: Vec<Transaction>,
    /// A validation failure is being shown; only `Retry` clears it
    pub error: bool,
    /// A validation is in flight
    pub loading: bool,
}

impl AtmState {
    /// True when the account accepts new requests
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.error && !self.loading
    }

    /// Returns the number of recorded transactions
    #[must_use]
    pub fn count(&self) -> usize {
        self.transactions.len()
    }

    /// Returns a transaction by id
    #[must_use]
    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }
}

/// Actions for the ATM account
///
/// Each variant is a fact, not a command: reducers and middleware interpret
/// it. Raw requests carry the amount as entered; validated outcomes carry
/// the parsed amount plus the identity and timestamp of the transaction to
/// record, so the reducer stays pure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtmAction {
    /// User asked to deposit; consumed by the validation middleware
    Deposit {
        /// Amount as entered, not yet validated
        amount: String,
    },

    /// User asked to withdraw; consumed by the validation middleware
    Withdraw {
        /// Amount as entered, not yet validated
        amount: String,
    },

    /// Validation started
    Validating,

    /// A deposit passed validation
    DepositValidated {
        /// Identity of the transaction to record
        id: TransactionId,
        /// Validated amount
        amount: u64,
        /// When validation completed
        at: DateTime<Utc>,
    },

    /// A withdrawal passed validation
    WithdrawalValidated {
        /// Identity of the transaction to record
        id: TransactionId,
        /// Validated amount
        amount: u64,
        /// When validation completed
        at: DateTime<Utc>,
    },

    /// Validation rejected the request
    ValidationFailed,

    /// User dismissed the error; the original request is not replayed
    Retry,

    /// User removed a transaction; its balance effect is reversed
    RemoveTransaction {
        /// Transaction to remove
        id: TransactionId,
    },

    /// User opened a transaction for editing; consumed by navigation
    EditTransaction {
        /// Transaction to edit
        id: TransactionId,
    },
}

impl AtmAction {
    /// True for actions originating from the user rather than middleware
    #[must_use]
    pub const fn is_user_action(&self) -> bool {
        matches!(
            self,
            Self::Deposit { .. }
                | Self::Withdraw { .. }
                | Self::Retry
                | Self::RemoveTransaction { .. }
                | Self::EditTransaction { .. }
        )
    }
}

/// Screens the navigation collaborator can be asked to show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// The main balance screen
    Atm,
    /// The transaction editing screen
    Transaction,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Atm => write!(f, "atm"),
            Self::Transaction => write!(f, "transaction"),
        }
    }
}
