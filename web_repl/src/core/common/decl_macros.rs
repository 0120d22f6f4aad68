// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Wrap the given value in `Ok`, or return `Ok(())` if no value is given. Reads better
/// at the end of long functions that return `Result`.
///
/// ```
/// use r3bl_web_repl::ok;
///
/// fn returns_unit() -> miette::Result<()> { ok!() }
/// fn returns_value() -> miette::Result<usize> { ok!(42) }
///
/// assert!(returns_unit().is_ok());
/// assert_eq!(returns_value().unwrap(), 42);
/// ```
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}
