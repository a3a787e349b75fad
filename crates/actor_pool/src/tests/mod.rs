//! End-to-end pooling scenarios
