mod common;
mod fees;
mod waiver;
