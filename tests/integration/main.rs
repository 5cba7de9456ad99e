//! Integration tests exercising the public API end to end.

mod ledger_properties;
mod simulation;
