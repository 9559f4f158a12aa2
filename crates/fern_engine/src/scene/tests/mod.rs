//! Scenario tests for the scene graph invariants

mod support;
