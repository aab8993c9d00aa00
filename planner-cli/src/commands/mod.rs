pub mod cancel;
pub mod check;
pub mod expand;
pub mod next;
pub mod resolve;
