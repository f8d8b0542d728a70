//! Capability dispatch over arbitrary values
//!
//! Each helper asks a value for an optional capability and falls back to a
//! safe default when it is absent, so it can be called on anything that
//! implements [`Capabilities`] (an empty impl opts a type in with no
//! capabilities at all).

use std::sync::Arc;
use std::time::Duration;

use crate::cell::ObligationCell;
use crate::obligation::Obligation;

/// Direct retrieval of the settled payload
pub trait Derefable {
    type Payload;
    fn deref(&self) -> Option<Self::Payload>;
}

/// Timeout-aware retrieval of the payload
pub trait HasValue {
    type Payload;
    fn value(&self, timeout: Option<Duration>) -> Option<Self::Payload>;
}

pub trait Pending {
    fn is_pending(&self) -> bool;
}

pub trait Fulfilled {
    fn is_fulfilled(&self) -> bool;
}

pub trait Realized {
    fn is_realized(&self) -> bool;
}

pub trait Rejected {
    fn is_rejected(&self) -> bool;
}

/// Optional capability casts; every cast defaults to absent
pub trait Capabilities {
    type Payload;

    fn as_deref(&self) -> Option<&dyn Derefable<Payload = Self::Payload>> {
        None
    }

    fn as_value(&self) -> Option<&dyn HasValue<Payload = Self::Payload>> {
        None
    }

    fn as_pending(&self) -> Option<&dyn Pending> {
        None
    }

    fn as_fulfilled(&self) -> Option<&dyn Fulfilled> {
        None
    }

    fn as_realized(&self) -> Option<&dyn Realized> {
        None
    }

    fn as_rejected(&self) -> Option<&dyn Rejected> {
        None
    }
}

/// The payload, via `deref` or else `value`; absent if neither is exposed
pub fn deref<C: Capabilities + ?Sized>(x: &C) -> Option<C::Payload> {
    if let Some(d) = x.as_deref() {
        d.deref()
    } else if let Some(v) = x.as_value() {
        v.value(None)
    } else {
        None
    }
}

/// `false` unless the value reports itself pending
pub fn is_pending<C: Capabilities + ?Sized>(x: &C) -> bool {
    x.as_pending().is_some_and(|p| p.is_pending())
}

/// Fulfilled, falling back to realized, else `false`
pub fn is_fulfilled<C: Capabilities + ?Sized>(x: &C) -> bool {
    if let Some(f) = x.as_fulfilled() {
        f.is_fulfilled()
    } else if let Some(r) = x.as_realized() {
        r.is_realized()
    } else {
        false
    }
}

/// Realized, falling back to fulfilled, else `false`
pub fn is_realized<C: Capabilities + ?Sized>(x: &C) -> bool {
    if let Some(r) = x.as_realized() {
        r.is_realized()
    } else if let Some(f) = x.as_fulfilled() {
        f.is_fulfilled()
    } else {
        false
    }
}

/// `false` unless the value reports itself rejected
pub fn is_rejected<C: Capabilities + ?Sized>(x: &C) -> bool {
    x.as_rejected().is_some_and(|r| r.is_rejected())
}

// ============ OBLIGATION CELL ============

impl<T: Clone, E: Clone> Derefable for ObligationCell<T, E> {
    type Payload = T;

    fn deref(&self) -> Option<T> {
        Obligation::value(self, None)
    }
}

impl<T: Clone, E: Clone> HasValue for ObligationCell<T, E> {
    type Payload = T;

    fn value(&self, timeout: Option<Duration>) -> Option<T> {
        Obligation::value(self, timeout)
    }
}

impl<T: Clone, E: Clone> Pending for ObligationCell<T, E> {
    fn is_pending(&self) -> bool {
        Obligation::is_pending(self)
    }
}

impl<T: Clone, E: Clone> Fulfilled for ObligationCell<T, E> {
    fn is_fulfilled(&self) -> bool {
        Obligation::is_fulfilled(self)
    }
}

impl<T: Clone, E: Clone> Realized for ObligationCell<T, E> {
    fn is_realized(&self) -> bool {
        Obligation::is_realized(self)
    }
}

impl<T: Clone, E: Clone> Rejected for ObligationCell<T, E> {
    fn is_rejected(&self) -> bool {
        Obligation::is_rejected(self)
    }
}

impl<T: Clone, E: Clone> Capabilities for ObligationCell<T, E> {
    type Payload = T;

    fn as_deref(&self) -> Option<&dyn Derefable<Payload = T>> {
        Some(self)
    }

    fn as_value(&self) -> Option<&dyn HasValue<Payload = T>> {
        Some(self)
    }

    fn as_pending(&self) -> Option<&dyn Pending> {
        Some(self)
    }

    fn as_fulfilled(&self) -> Option<&dyn Fulfilled> {
        Some(self)
    }

    fn as_realized(&self) -> Option<&dyn Realized> {
        Some(self)
    }

    fn as_rejected(&self) -> Option<&dyn Rejected> {
        Some(self)
    }
}

// ============ FORWARDING ============

impl<C: Capabilities + ?Sized> Capabilities for &C {
    type Payload = C::Payload;

    fn as_deref(&self) -> Option<&dyn Derefable<Payload = C::Payload>> {
        (**self).as_deref()
    }

    fn as_value(&self) -> Option<&dyn HasValue<Payload = C::Payload>> {
        (**self).as_value()
    }

    fn as_pending(&self) -> Option<&dyn Pending> {
        (**self).as_pending()
    }

    fn as_fulfilled(&self) -> Option<&dyn Fulfilled> {
        (**self).as_fulfilled()
    }

    fn as_realized(&self) -> Option<&dyn Realized> {
        (**self).as_realized()
    }

    fn as_rejected(&self) -> Option<&dyn Rejected> {
        (**self).as_rejected()
    }
}

impl<C: Capabilities + ?Sized> Capabilities for Arc<C> {
    type Payload = C::Payload;

    fn as_deref(&self) -> Option<&dyn Derefable<Payload = C::Payload>> {
        (**self).as_deref()
    }

    fn as_value(&self) -> Option<&dyn HasValue<Payload = C::Payload>> {
        (**self).as_value()
    }

    fn as_pending(&self) -> Option<&dyn Pending> {
        (**self).as_pending()
    }

    fn as_fulfilled(&self) -> Option<&dyn Fulfilled> {
        (**self).as_fulfilled()
    }

    fn as_realized(&self) -> Option<&dyn Realized> {
        (**self).as_realized()
    }

    fn as_rejected(&self) -> Option<&dyn Rejected> {
        (**self).as_rejected()
    }
}

// Plain values expose no capabilities
macro_rules! no_capabilities {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Capabilities for $ty {
                type Payload = ();
            }
        )*
    };
}

no_capabilities!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    str, String,
);

#[cfg(test)]
mod tests {
    use super::*;

    /// Exposes only `value`, like a bare future
    struct ValueOnly(u32);

    impl HasValue for ValueOnly {
        type Payload = u32;

        fn value(&self, _timeout: Option<Duration>) -> Option<u32> {
            Some(self.0)
        }
    }

    impl Capabilities for ValueOnly {
        type Payload = u32;

        fn as_value(&self) -> Option<&dyn HasValue<Payload = u32>> {
            Some(self)
        }
    }

    /// Exposes only `realized?`
    struct RealizedOnly;

    impl Realized for RealizedOnly {
        fn is_realized(&self) -> bool {
            true
        }
    }

    impl Capabilities for RealizedOnly {
        type Payload = ();

        fn as_realized(&self) -> Option<&dyn Realized> {
            Some(self)
        }
    }

    #[test]
    fn test_deref_matches_value() {
        let cell = ObligationCell::<u32>::fulfilled(9);
        assert_eq!(deref(&cell), Obligation::value(&cell, None));
        assert_eq!(deref(&Arc::new(cell)), Some(9));
    }

    #[test]
    fn test_deref_falls_back_to_value() {
        assert_eq!(deref(&ValueOnly(3)), Some(3));
    }

    #[test]
    fn test_plain_values_have_no_capabilities() {
        assert_eq!(deref(&5_i32), None);
        assert_eq!(deref("text"), None);
        assert!(!is_pending(&String::from("x")));
        assert!(!is_fulfilled(&true));
        assert!(!is_realized(&1.5_f64));
        assert!(!is_rejected(&()));
    }

    #[test]
    fn test_fulfilled_and_realized_fall_back_to_each_other() {
        assert!(is_fulfilled(&RealizedOnly));
        assert!(is_realized(&RealizedOnly));
        assert!(!is_pending(&RealizedOnly));
    }

    #[test]
    fn test_predicates_on_obligation() {
        let (resolver, cell) = ObligationCell::<u32, String>::pending();
        assert!(is_pending(&cell));
        assert!(!is_fulfilled(&cell));

        resolver.reject("bad".to_string());
        assert!(is_rejected(&cell));
        assert!(!is_realized(&cell));
        assert_eq!(deref(&cell), None);
    }
}
