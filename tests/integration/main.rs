//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the ritual against mock
//! adapters.  No camera or box controller is required.

mod channel_tests;
mod mock_hw;
mod ritual_flow_tests;
