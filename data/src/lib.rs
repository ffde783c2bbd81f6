//! Key/value data attached to game objects.
//!
//! A [`Data`] maps string keys to a [`DataValue`] tagged with the [`DataType`] it was stored
//! as. [`DataImpl`] is the default implementation, [`EMPTY`] an always-empty instance that
//! ignores every mutation.

use std::{collections::HashSet, fmt::Debug};

mod store;
mod value;

pub use store::DataImpl;
pub use value::{DataType, DataTypeMismatch, DataValue};

pub trait Data: Debug + Send + Sync {
    /// Stores `value` under `key` as `data_type`, or removes `key` if `value` is `None`.
    ///
    /// `data_type` is taken as given, callers reading the value back are expected to agree
    /// with it.
    fn set_typed(&mut self, key: &str, value: Option<DataValue>, data_type: DataType);

    /// Stores `value` under `key` as its own type, or removes `key` if `value` is `None`.
    fn set(&mut self, key: &str, value: Option<DataValue>) {
        match value {
            Some(value) => {
                let data_type = value.data_type();
                self.set_typed(key, Some(value), data_type);
            }
            None => {
                self.remove(key);
            }
        }
    }

    fn remove(&mut self, key: &str) -> Option<DataValue>;

    /// The value stored under `key`. Stored values are never null, so `None` always means
    /// the key is absent.
    fn get(&self, key: &str) -> Option<&DataValue>;

    fn get_or_default<'a>(&'a self, key: &str, default: &'a DataValue) -> &'a DataValue {
        self.get(key).unwrap_or(default)
    }

    /// The type `key` was stored as.
    fn data_type(&self, key: &str) -> Option<DataType>;

    fn has_key(&self, key: &str) -> bool;

    fn keys(&self) -> HashSet<&str>;

    fn is_empty(&self) -> bool;

    /// An independent copy of this data.
    fn copy(&self) -> Box<dyn Data>;
}

/// Typed access on top of [`Data`].
pub trait DataExt: Data {
    /// The value under `key` converted to `T`, or `None` if absent or of another type.
    fn get_as<'a, T>(&'a self, key: &str) -> Option<T>
    where
        T: TryFrom<&'a DataValue>,
    {
        self.get(key).and_then(|value| T::try_from(value).ok())
    }

    fn get_as_or<'a, T>(&'a self, key: &str, default: T) -> T
    where
        T: TryFrom<&'a DataValue>,
    {
        self.get_as(key).unwrap_or(default)
    }

    fn put(&mut self, key: &str, value: impl Into<DataValue>) {
        self.set(key, Some(value.into()));
    }
}

impl<D: Data + ?Sized> DataExt for D {}

impl Clone for Box<dyn Data> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

/// The data that is always empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyData;

pub const EMPTY: EmptyData = EmptyData;

impl Data for EmptyData {
    fn set_typed(&mut self, _key: &str, _value: Option<DataValue>, _data_type: DataType) {}

    fn remove(&mut self, _key: &str) -> Option<DataValue> {
        None
    }

    fn get(&self, _key: &str) -> Option<&DataValue> {
        None
    }

    fn data_type(&self, _key: &str) -> Option<DataType> {
        None
    }

    fn has_key(&self, _key: &str) -> bool {
        false
    }

    fn keys(&self) -> HashSet<&str> {
        HashSet::new()
    }

    fn is_empty(&self) -> bool {
        true
    }

    fn copy(&self) -> Box<dyn Data> {
        Box::new(EmptyData)
    }
}

/// An object carrying [`Data`].
pub trait DataContainer {
    fn data(&self) -> Option<&dyn Data>;

    fn set_data(&mut self, data: Option<Box<dyn Data>>);

    fn data_or_empty(&self) -> &dyn Data {
        self.data().unwrap_or(&EMPTY)
    }
}
