use std::borrow::Cow;

/// ErrorMetadata object can be attached to an anyhow error chain via
/// `.context(e /*ErrorMetadata*/)`. It tags an error with enough information
/// for callers to classify it without string matching on the message.
///
/// The short_msg is used as a tag, available for tests and for metrics
/// logging, that is resilient to changes in copy.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{msg}")]
pub struct ErrorMetadata {
    /// The error code associated with this ErrorMetadata
    pub code: ErrorCode,
    /// short ScreamingCamelCase. Usable in tests for string matching
    /// w/ a standard test helper.
    /// Eg InvalidFieldPath
    pub short_msg: Cow<'static, str>,
    /// human readable - developer facing. Should be longer and descriptive.
    /// Eg "Field path segments may not be empty"
    pub msg: Cow<'static, str>,
}

#[cfg_attr(any(test, feature = "testing"), derive(proptest_derive::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadRequest,
    OperationalInternalServerError,
}

pub const INTERNAL_SERVER_ERROR: &str = "InternalServerError";
pub const INTERNAL_SERVER_ERROR_MSG: &str = "Your request couldn't be completed. Try again later.";

impl ErrorMetadata {
    /// Bad Request. The caller built something invalid and retrying will not
    /// help.
    ///
    /// The short_msg should be a CapitalCamelCased describing the error.
    /// The msg should be a descriptive message targeted toward the developer.
    pub fn bad_request(
        short_msg: impl Into<Cow<'static, str>>,
        msg: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            code: ErrorCode::BadRequest,
            short_msg: short_msg.into(),
            msg: msg.into(),
        }
    }

    /// An internal invariant did not hold. Not the caller's fault.
    pub fn operational_internal_server_error() -> Self {
        Self {
            code: ErrorCode::OperationalInternalServerError,
            short_msg: INTERNAL_SERVER_ERROR.into(),
            msg: INTERNAL_SERVER_ERROR_MSG.into(),
        }
    }

    pub fn is_bad_request(&self) -> bool {
        self.code == ErrorCode::BadRequest
    }

    /// Errors that will recur on every retry with the same input.
    pub fn is_deterministic_user_error(&self) -> bool {
        match self.code {
            ErrorCode::BadRequest => true,
            ErrorCode::OperationalInternalServerError => false,
        }
    }
}

pub trait ErrorMetadataAnyhowExt {
    fn is_bad_request(&self) -> bool;
    fn is_deterministic_user_error(&self) -> bool;
    fn short_msg(&self) -> &str;
    fn msg(&self) -> &str;
}

impl ErrorMetadataAnyhowExt for anyhow::Error {
    /// Returns true if error is tagged as BadRequest
    fn is_bad_request(&self) -> bool {
        if let Some(e) = self.downcast_ref::<ErrorMetadata>() {
            return e.is_bad_request();
        }
        false
    }

    fn is_deterministic_user_error(&self) -> bool {
        if let Some(e) = self.downcast_ref::<ErrorMetadata>() {
            return e.is_deterministic_user_error();
        }
        false
    }

    /// Return the short_msg associated with this Error
    fn short_msg(&self) -> &str {
        if let Some(e) = self.downcast_ref::<ErrorMetadata>() {
            return &e.short_msg;
        }
        INTERNAL_SERVER_ERROR
    }

    /// Return the descriptive msg associated with this Error
    fn msg(&self) -> &str {
        if let Some(e) = self.downcast_ref::<ErrorMetadata>() {
            return &e.msg;
        }
        INTERNAL_SERVER_ERROR_MSG
    }
}

#[cfg(any(test, feature = "testing"))]
mod arbitrary {
    use proptest::prelude::*;

    use super::{
        ErrorCode,
        ErrorMetadata,
    };

    impl Arbitrary for ErrorMetadata {
        type Parameters = ();

        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
            any::<ErrorCode>()
                .prop_map(|ec| match ec {
                    ErrorCode::BadRequest => ErrorMetadata::bad_request("bad", "request"),
                    ErrorCode::OperationalInternalServerError => {
                        ErrorMetadata::operational_internal_server_error()
                    },
                })
                .boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{
        ErrorCode,
        ErrorMetadata,
        ErrorMetadataAnyhowExt,
        INTERNAL_SERVER_ERROR,
    };

    proptest! {
        #![proptest_config(
            ProptestConfig { failure_persistence: None, ..ProptestConfig::default() }
        )]

        #[test]
        fn test_short_msg_survives_context(err in any::<ErrorMetadata>()) {
            let wrapped = anyhow::anyhow!("underlying").context(err.clone());
            assert_eq!(wrapped.short_msg(), &*err.short_msg);
            assert_eq!(wrapped.is_bad_request(), err.code == ErrorCode::BadRequest);
            assert_eq!(wrapped.is_deterministic_user_error(), err.is_bad_request());
        }
    }

    #[test]
    fn test_untagged_error_is_internal() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(err.short_msg(), INTERNAL_SERVER_ERROR);
        assert!(!err.is_bad_request());
    }
}
