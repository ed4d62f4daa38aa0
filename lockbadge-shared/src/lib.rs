pub mod countdown;
pub mod push;
