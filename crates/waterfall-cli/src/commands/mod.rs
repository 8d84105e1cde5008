pub mod calculate;
pub mod carry;
pub mod common;
pub mod rounds;
pub mod terms;
