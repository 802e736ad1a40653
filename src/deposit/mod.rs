// Deposit module - THE ONLY WAY IN
// Moves funds from the external token ledger into locked balances

mod handler;
mod token;

pub use handler::*;
pub use token::*;
