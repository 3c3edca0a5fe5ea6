use std::cell::RefCell;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// Serialize an iterator as a sequence without collecting it first
///
/// The iterator is consumed by serializing, so this can only be done once.
pub struct SerializableIterator<I> {
    iterator: RefCell<Option<I>>,
}
impl<I> SerializableIterator<I> {
    pub fn new(iterator: I) -> Self {
        SerializableIterator {
            iterator: RefCell::new(Some(iterator)),
        }
    }
}
impl<T, I> Serialize for SerializableIterator<I>
where
    T: Serialize,
    I: Iterator<Item = T>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // shorthand to convert any T: Display into an S::Error
        macro_rules! error {
            ($msg:expr) => {
                <S::Error as serde::ser::Error>::custom($msg)
            };
        }

        let iterator = self
            .iterator
            .try_borrow_mut()
            .map_err(|err| error!(err.to_string()))?
            .take()
            .ok_or_else(|| error!("Can't serialize a SerializableIterator twice"))?;

        // Some formats require the length upfront
        let len = match iterator.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower),
            _ => None,
        };
        let mut seq = serializer.serialize_seq(len)?;
        for item in iterator {
            seq.serialize_element(&item)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod test {
    use super::SerializableIterator;

    #[test]
    fn serialize_once() {
        let iterator = SerializableIterator::new((1..=3).map(|i| i * 2));
        assert_eq!(serde_json::to_string(&iterator).unwrap(), "[2,4,6]");
        assert!(serde_json::to_string(&iterator).is_err());
    }

    #[test]
    fn unknown_length() {
        let iterator = SerializableIterator::new((1..10).filter(|i| i % 3 == 0));
        assert_eq!(serde_json::to_string(&iterator).unwrap(), "[3,6,9]");
    }
}
