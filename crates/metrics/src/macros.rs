/// Register an integer counter with the process metrics registry and store
/// in a static variable.
/// An optional third argument allows specifying labels for this metric.
/// The reported metric name will be the lower_snake_case version of the
/// declared variable name.
#[macro_export]
macro_rules! register_counter {
    ($VIS:vis $NAME:ident, $HELP:literal $(,)?) => {
        $VIS static $NAME: std::sync::LazyLock<$crate::prometheus::IntCounter> =
            std::sync::LazyLock::new(|| $crate::register_counter_owned!(
                $NAME,
                $HELP,
            ));
    };
    ($VIS:vis $NAME:ident, $HELP:literal, $LABELS:expr $(,)?) => {
        $VIS static $NAME: std::sync::LazyLock<$crate::prometheus::IntCounterVec> =
            std::sync::LazyLock::new(|| $crate::register_counter_owned!(
                $NAME,
                $HELP,
                $LABELS,
            ));
    };
}

/// Register an integer counter with the process metrics registry and return
/// as an expression.
#[macro_export]
macro_rules! register_counter_owned {
    ($NAME:ident, $HELP:literal $(,)?) => {{
        $crate::paste! {
            let name = $crate::metric_name!(stringify!([<$NAME:lower>]));
        }
        let help = $crate::metric_help!($HELP);
        #[allow(clippy::disallowed_macros)]
        $crate::prometheus::register_int_counter_with_registry!(
            &*name,
            &*help,
            $crate::METRICS_REGISTRY,
        )
        .expect("Metric initialization failed")
    }};
    ($NAME:ident, $HELP:literal, $LABELS:expr $(,)?) => {{
        $crate::paste! {
            let name = $crate::metric_name!(stringify!([<$NAME:lower>]));
        }
        let help = $crate::metric_help!($HELP);
        #[allow(clippy::disallowed_macros)]
        $crate::prometheus::register_int_counter_vec_with_registry!(
            &*name,
            &*help,
            $LABELS,
            $crate::METRICS_REGISTRY,
        )
        .expect("Metric initialization failed")
    }};
}
