//! Component-level tests for the public car park API.

mod unit;
