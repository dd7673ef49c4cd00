#[macro_export]
macro_rules! try_some {
    (@coalesce ($($h:tt)*)) => {
        $($h)*
    };
    (@coalesce ($($h:tt)*) ? $($t:tt)*) => {
        $crate::try_some!(@coalesce ($($h)*.as_ref()?) $($t)*)
    };
    (@coalesce ($($h:tt)*) $m:tt $($t:tt)*) => {
        $crate::try_some!(@coalesce ($($h)* $m) $($t)*)
    };

    (& $($tt:tt)*) => {
        (|| -> ::std::option::Option<_> {
            ::std::option::Option::Some(& $crate::try_some!(@coalesce () $($tt)*))
        })()
    };
    ($($tt:tt)*) => {
        (|| -> ::std::option::Option<_> {
            ::std::option::Option::Some($crate::try_some!(@coalesce () $($tt)*))
        })()
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $($tt:tt)+) => {{
        let value = $expr;
        match value {
            $($tt)* => {}
            _ => ::std::panic!(
                "Expression = `{}`, value = `{:?}` does not match with pattern = `{}`.",
                stringify!($expr),
                value,
                stringify!($($tt)*),
            ),
        }
    }};
}
