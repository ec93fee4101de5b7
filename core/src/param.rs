//! Conversion of header, query and cookie values to text.
//!
//! Every setter on `RequestBuilder` accepts an `IntoIterator` whose items
//! implement `ParamValue`. Arrays, `Vec`s, sets, slices and `Option`s all
//! qualify, so one entry point covers what would otherwise be one overload
//! per primitive type. `None` items convert to nothing and are dropped by
//! the lenient setters.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use uuid::Uuid;

/// A value that can be written into a header, query parameter or cookie.
pub trait ParamValue {
    /// Text form of the value, `None` for a missing value.
    fn to_param_text(&self) -> Option<String>;
}

macro_rules! display_param_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                fn to_param_text(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

display_param_value!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, str,
    String, Uuid,
);

impl ParamValue for Cow<'_, str> {
    fn to_param_text(&self) -> Option<String> {
        Some(self.as_ref().to_owned())
    }
}

impl<T: ParamValue> ParamValue for Option<T> {
    fn to_param_text(&self) -> Option<String> {
        self.as_ref().and_then(ParamValue::to_param_text)
    }
}

impl<T: ParamValue + ?Sized> ParamValue for &T {
    fn to_param_text(&self) -> Option<String> {
        (**self).to_param_text()
    }
}

impl<T: ParamValue + ?Sized> ParamValue for Box<T> {
    fn to_param_text(&self) -> Option<String> {
        (**self).to_param_text()
    }
}

impl<T: ParamValue + ?Sized> ParamValue for Rc<T> {
    fn to_param_text(&self) -> Option<String> {
        (**self).to_param_text()
    }
}

impl<T: ParamValue + ?Sized> ParamValue for Arc<T> {
    fn to_param_text(&self) -> Option<String> {
        (**self).to_param_text()
    }
}

/// Uses the `Display` form of any value.
///
/// ```
/// use std::net::Ipv4Addr;
/// use restcall_core::{Displayed, ParamValue};
///
/// let value = Displayed(Ipv4Addr::LOCALHOST);
/// assert_eq!(value.to_param_text().as_deref(), Some("127.0.0.1"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displayed<T>(pub T);

impl<T: fmt::Display> ParamValue for Displayed<T> {
    fn to_param_text(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// Convert all values, dropping missing ones.
pub(crate) fn collect_present<I>(values: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: ParamValue,
{
    values
        .into_iter()
        .filter_map(|value| value.to_param_text())
        .collect()
}

/// Convert all values; `None` as soon as one of them is missing.
pub(crate) fn collect_all<I>(values: I) -> Option<Vec<String>>
where
    I: IntoIterator,
    I::Item: ParamValue,
{
    values
        .into_iter()
        .map(|value| value.to_param_text())
        .collect()
}
