use serde::{Deserialize, Serialize};

use crate::entities::Stop;
use crate::error::{index_out_of_range_error, invalid_input_error, Error};

/// Stops in the order the directions provider visits them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Waypoints(Vec<Stop>);

impl Waypoints {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// `|` separates waypoints on the provider's wire, so addresses may not contain it.
    pub fn append(&mut self, stop: Stop) -> Result<(), Error> {
        if stop.is_empty() || matches!(&stop, Stop::Address(address) if address.contains('|')) {
            return Err(invalid_input_error());
        }

        self.0.push(stop);
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Stop, Error> {
        if index >= self.0.len() {
            return Err(index_out_of_range_error(index, self.0.len()));
        }

        Ok(self.0.remove(index))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn replace_all(&mut self, stops: Vec<Stop>) {
        self.0 = stops;
    }

    pub fn as_slice(&self) -> &[Stop] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stop> {
        self.0.iter()
    }
}

impl From<Vec<Stop>> for Waypoints {
    fn from(stops: Vec<Stop>) -> Self {
        Self(stops)
    }
}

#[test]
fn waypoints_keep_insertion_order() {
    let mut waypoints = Waypoints::new();
    waypoints.append("A".into()).unwrap();
    waypoints.append("B".into()).unwrap();
    waypoints.append("C".into()).unwrap();

    assert_eq!(
        waypoints.as_slice(),
        &[Stop::from("A"), Stop::from("B"), Stop::from("C")]
    );

    assert_eq!(waypoints.remove_at(1).unwrap(), Stop::from("B"));
    assert_eq!(waypoints.as_slice(), &[Stop::from("A"), Stop::from("C")]);
}

#[test]
fn waypoints_reject_blank_and_out_of_range() {
    use crate::error::INDEX_OUT_OF_RANGE_ERROR;

    let mut waypoints = Waypoints::new();
    assert!(waypoints.append("".into()).is_err());
    assert!(waypoints.is_empty());

    assert!(waypoints.append("Sants|Gràcia".into()).is_err());
    assert!(waypoints.is_empty());

    let err = waypoints.remove_at(0).unwrap_err();
    assert!(err.is(INDEX_OUT_OF_RANGE_ERROR));
}

#[test]
fn waypoints_replace_and_clear() {
    use crate::entities::Coordinates;

    let mut waypoints = Waypoints::from(vec![Stop::from("A")]);
    waypoints.replace_all(vec![Coordinates::new(1.0, 2.0).into()]);
    assert_eq!(waypoints.len(), 1);
    assert_eq!(waypoints.as_slice()[0].coordinates(), Some(Coordinates::new(1.0, 2.0)));

    waypoints.clear();
    assert!(waypoints.is_empty());
}
