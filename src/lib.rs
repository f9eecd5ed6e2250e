//! An insertion-ordered hash map.
//!
//! [`OrderedMap`] iterates its entries in the order they were added, supports inserting and removing at arbitrary
//! positions, and still finds any key in O(1) average time. The position recorded for each key is kept up to date
//! through every insertion and removal, so key lookups and positional lookups never disagree.
//!
//! ```
//! use ordmap::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.insert("a", 1);
//! map.insert("b", 2);
//! map.insert("c", 3);
//!
//! map.insert_at(1, "x", 9).unwrap();
//! assert_eq!(map.get_index_of("b"), Some(2));
//!
//! map.remove("a");
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["x", "b", "c"]);
//! assert_eq!(map.get_index_of("b"), Some(1));
//! ```

mod error;
pub mod hash;
pub mod log;
pub mod map;
pub mod rand;

pub use error::OutOfRange;
pub use hash::RandomState;
pub use map::OrderedMap;
