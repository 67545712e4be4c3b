//! Color -> asset table backed by a fixed array indexed by `ColorType::ordinal`.

use serde::Deserialize;

use crate::core::color::ColorType;

/// One configuration entry: a color and the asset shown for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAsset<H> {
    pub color: ColorType,
    pub handle: H,
}

impl<H> ColorAsset<H> {
    pub fn new(color: ColorType, handle: H) -> Self {
        Self { color, handle }
    }
}

/// Which entry survives when the initial configuration lists a color twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum DuplicatePolicy {
    #[default]
    FirstWins,
    LastWins,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssetTable<H> {
    slots: [Option<H>; ColorType::COUNT],
}

impl<H> Default for ColorAssetTable<H> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<H> ColorAssetTable<H> {
    /// Build from configuration entries. Wildcard entries are dropped.
    /// Returns the table and the number of entries that were discarded.
    pub fn from_entries<I>(entries: I, policy: DuplicatePolicy) -> (Self, usize)
    where
        I: IntoIterator<Item = ColorAsset<H>>,
    {
        let mut table = Self::default();
        let mut discarded = 0;
        for ColorAsset { color, handle } in entries {
            if color.is_wildcard() {
                discarded += 1;
                continue;
            }
            let slot = &mut table.slots[color.ordinal()];
            match (slot.is_some(), policy) {
                (true, DuplicatePolicy::FirstWins) => discarded += 1,
                (true, DuplicatePolicy::LastWins) => {
                    discarded += 1;
                    *slot = Some(handle);
                }
                (false, _) => *slot = Some(handle),
            }
        }
        (table, discarded)
    }

    #[inline]
    pub fn get(&self, color: ColorType) -> Option<&H> {
        self.slots[color.ordinal()].as_ref()
    }

    /// Insert or overwrite; returns the previous handle. The wildcard is rejected
    /// and hands the handle back.
    pub fn insert(&mut self, color: ColorType, handle: H) -> Result<Option<H>, H> {
        if color.is_wildcard() {
            return Err(handle);
        }
        Ok(self.slots[color.ordinal()].replace(handle))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<ColorAsset<&'static str>> {
        vec![
            ColorAsset::new(ColorType::Red, "red_a"),
            ColorAsset::new(ColorType::Blue, "blue"),
            ColorAsset::new(ColorType::Red, "red_b"),
        ]
    }

    #[test]
    fn first_wins_keeps_earliest_duplicate() {
        let (t, discarded) = ColorAssetTable::from_entries(entries(), DuplicatePolicy::FirstWins);
        assert_eq!(t.get(ColorType::Red), Some(&"red_a"));
        assert_eq!(t.len(), 2);
        assert_eq!(discarded, 1);
    }

    #[test]
    fn last_wins_keeps_latest_duplicate() {
        let (t, _) = ColorAssetTable::from_entries(entries(), DuplicatePolicy::LastWins);
        assert_eq!(t.get(ColorType::Red), Some(&"red_b"));
    }

    #[test]
    fn wildcard_never_stored() {
        let (mut t, discarded) = ColorAssetTable::from_entries(
            vec![ColorAsset::new(ColorType::Any, "any")],
            DuplicatePolicy::FirstWins,
        );
        assert!(t.is_empty());
        assert_eq!(discarded, 1);
        assert_eq!(t.insert(ColorType::Any, "x"), Err("x"));
        assert_eq!(t.get(ColorType::Any), None);
    }

    #[test]
    fn insert_overwrites_and_returns_previous() {
        let mut t = ColorAssetTable::default();
        assert_eq!(t.insert(ColorType::Green, 1), Ok(None));
        assert_eq!(t.insert(ColorType::Green, 2), Ok(Some(1)));
        assert_eq!(t.get(ColorType::Green), Some(&2));
    }
}
