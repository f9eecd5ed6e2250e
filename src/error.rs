/// A positional operation was given a position past the end of the map.
///
/// `len` is the length of the map at the time of the call. For [`OrderedMap::insert_at`], `position == len` is valid,
/// so this is only returned for `position > len`.
///
/// [`OrderedMap::insert_at`]: crate::OrderedMap::insert_at
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct OutOfRange {
    pub position: usize,
    pub len: usize,
}

impl core::fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!(
            "position {} is out of range for an ordered map of length {}",
            self.position, self.len
        ))
    }
}

impl std::error::Error for OutOfRange {}
