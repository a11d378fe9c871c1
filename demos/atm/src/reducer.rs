//! Balance reducer.
//!
//! The only place the account state changes. Validated outcomes adjust the
//! balance and the ledger; raw requests and navigation actions are identity
//! here because middleware consumes them.

use crate::types::{AtmAction, AtmState, Transaction, TransactionKind};
use ledgerflow_core::reducer::Reducer;

/// Reducer for the ATM account state
///
/// Total over the closed action set and pure: every input the new state
/// needs (parsed amount, transaction id, timestamp) arrives in the action.
/// Balance arithmetic saturates so the reducer can never panic.
#[derive(Clone, Copy, Debug, Default)]
pub struct BalanceReducer;

impl BalanceReducer {
    /// Creates a new `BalanceReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for BalanceReducer {
    type State = AtmState;
    type Action = AtmAction;

    fn reduce(&self, state: &mut Self::State, action: &Self::Action) {
        match action {
            AtmAction::Validating => {
                state.loading = true;
                state.error = false;
            }

            AtmAction::DepositValidated { id, amount, at } => {
                state.balance = state.balance.saturating_add_unsigned(*amount);
                state.transactions.push(Transaction::new(
                    id.clone(),
                    *amount,
                    TransactionKind::Income,
                    format!("Deposit of {amount}"),
                    *at,
                ));
                state.error = false;
                state.loading = false;
            }

            AtmAction::WithdrawalValidated { id, amount, at } => {
                // No floor: the balance is allowed to go negative.
                state.balance = state.balance.saturating_sub_unsigned(*amount);
                state.transactions.push(Transaction::new(
                    id.clone(),
                    *amount,
                    TransactionKind::Expense,
                    format!("Withdrawal of {amount}"),
                    *at,
                ));
                state.error = false;
                state.loading = false;
            }

            AtmAction::ValidationFailed => {
                state.error = true;
                state.loading = false;
            }

            AtmAction::Retry => {
                state.error = false;
                state.loading = false;
            }

            AtmAction::RemoveTransaction { id } => {
                // Unknown ids are a no-op, not an error.
                if let Some(pos) = state.transactions.iter().position(|t| &t.id == id) {
                    let removed = state.transactions.remove(pos);
                    state.balance = match removed.kind {
                        TransactionKind::Income => {
                            state.balance.saturating_sub_unsigned(removed.amount)
                        }
                        TransactionKind::Expense => {
                            state.balance.saturating_add_unsigned(removed.amount)
                        }
                    };
                }
            }

            // Consumed by middleware, identity here.
            AtmAction::Deposit { .. }
            | AtmAction::Withdraw { .. }
            | AtmAction::EditTransaction { .. } => {}
        }
    }
}
