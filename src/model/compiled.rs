//! Merging many single-instance masks into one class/instance raster pair.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use ndarray::Zip;

use crate::model::mask::{Deferred, Mask};
use crate::raster::{BinaryMask, IndexMask};

/// Bits reserved for the instance id when pairing class and instance
/// rasters pixel-by-pixel.
const CLASS_SHIFT: u32 = 16;

/// Class- and instance-segmentation rasters covering all instances at
/// once, as opposed to the single-instance [`Mask`].
///
/// A compiled mask is an ephemeral derived view: it is built on demand
/// from a batch of instance masks and discarded after use, never stored.
#[derive(Clone, Debug)]
pub struct CompiledMask {
    class_mask: Deferred<IndexMask>,
    instance_mask: Deferred<IndexMask>,
}

impl CompiledMask {
    /// Wraps precomputed (or deferred) class and instance rasters.
    pub fn new(
        class_mask: impl Into<Deferred<IndexMask>>,
        instance_mask: impl Into<Deferred<IndexMask>>,
    ) -> Self {
        Self {
            class_mask: class_mask.into(),
            instance_mask: instance_mask.into(),
        }
    }

    /// Joins instance masks into one class/instance raster pair.
    ///
    /// Masks are stable-sorted by ascending z-order before merging, so a
    /// higher z-order paints over a lower one on overlap; the overwrite is
    /// exact, never a blend. `instance_ids` and `instance_labels` override
    /// the produced ids positionally (in input order); missing entries
    /// default to the mask's 1-based position and its own label. A mask
    /// whose effective class id is 0 (or unset) keeps its pixels as
    /// background.
    ///
    /// Only one decoded raster is alive at a time next to the accumulating
    /// slot raster: masks can be large and the batch long, so the merge
    /// never materializes all of them together. Returns `None` for an
    /// empty batch, which has no raster dimensions to take.
    ///
    /// # Panics
    ///
    /// Panics if the masks disagree on raster dimensions.
    pub fn from_instance_masks(
        masks: &[Mask],
        instance_ids: &[u32],
        instance_labels: &[u32],
    ) -> Option<Self> {
        if masks.is_empty() {
            return None;
        }

        let mut order: Vec<usize> = (0..masks.len()).collect();
        order.sort_by_key(|&i| masks[i].z_order);

        // Slot 0 is background in both side tables.
        let mut instance_map: Vec<u32> = vec![0];
        let mut class_map: Vec<u32> = vec![0];

        let mut index_mask: Option<IndexMask> = None;
        for (position, &mask_index) in order.iter().enumerate() {
            let mask = &masks[mask_index];
            let slot = (position + 1) as u32;
            let instance_id = instance_ids.get(mask_index).copied().unwrap_or(slot);
            let class_id = instance_labels
                .get(mask_index)
                .copied()
                .or(mask.label)
                .unwrap_or(0);
            let paint = if class_id == 0 { 0 } else { slot };

            let image = mask.image();
            match &mut index_mask {
                None => index_mask = Some(image.mapv(|covered| if covered { paint } else { 0 })),
                Some(accumulated) => {
                    assert_eq!(
                        accumulated.dim(),
                        image.dim(),
                        "instance masks must share raster dimensions"
                    );
                    Zip::from(accumulated)
                        .and(&*image)
                        .for_each(|slot_pixel, &covered| {
                            if covered {
                                *slot_pixel = paint;
                            }
                        });
                }
            }
            instance_map.push(instance_id);
            class_map.push(class_id);
        }

        let index_mask = index_mask.expect("at least one mask was merged");
        let class_mask = index_mask.mapv(|slot| class_map[slot as usize]);
        let positional = instance_map
            .iter()
            .enumerate()
            .all(|(slot, &id)| id == slot as u32);
        let instance_mask = if positional {
            // Ids match the slot numbering, the raster is already final.
            index_mask
        } else {
            index_mask.mapv(|slot| instance_map[slot as usize])
        };

        Some(Self::new(class_mask, instance_mask))
    }

    /// The merged class-index raster.
    pub fn class_mask(&self) -> Cow<'_, IndexMask> {
        self.class_mask.get()
    }

    /// The merged instance-index raster.
    pub fn instance_mask(&self) -> Cow<'_, IndexMask> {
        self.instance_mask.get()
    }

    /// The highest instance id present.
    pub fn instance_count(&self) -> u32 {
        self.instance_mask().iter().copied().max().unwrap_or(0)
    }

    /// Pairs each instance with its class.
    ///
    /// The rasters are pixel-aligned, so packing `(class << 16) | instance`
    /// per pixel and collecting the distinct combinations with a nonzero
    /// instance part yields the {instance id: class id} map directly.
    pub fn get_instance_labels(&self) -> BTreeMap<u32, u32> {
        let class_mask = self.class_mask();
        let instance_mask = self.instance_mask();

        let mut combined = BTreeSet::new();
        Zip::from(&*class_mask)
            .and(&*instance_mask)
            .for_each(|&class_id, &instance_id| {
                combined.insert((class_id << CLASS_SHIFT) | (instance_id & 0xFFFF));
            });

        combined
            .into_iter()
            .filter(|key| key & 0xFFFF != 0)
            .map(|key| (key & 0xFFFF, key >> CLASS_SHIFT))
            .collect()
    }

    /// Extracts one instance as a binary mask.
    pub fn extract(&self, instance_id: u32) -> BinaryMask {
        self.instance_mask().mapv(|id| id == instance_id)
    }

    /// A deferred [`Self::extract`], materialized on each access.
    pub fn lazy_extract(&self, instance_id: u32) -> Deferred<BinaryMask> {
        let instance_mask = self.instance_mask.clone();
        Deferred::producer(move || instance_mask.get().mapv(|id| id == instance_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn left_mask() -> Mask {
        // Covers columns 0..3 of a 2x4 raster.
        Mask::new(array![
            [true, true, true, false],
            [true, true, true, false],
        ])
    }

    fn right_mask() -> Mask {
        // Covers columns 1..4, overlapping the left mask on columns 1..3.
        Mask::new(array![
            [false, true, true, true],
            [false, true, true, true],
        ])
    }

    #[test]
    fn test_higher_z_order_wins_on_overlap() {
        let low = left_mask().with_label(1).with_z_order(0);
        let high = right_mask().with_label(2).with_z_order(5);

        let compiled = CompiledMask::from_instance_masks(&[high, low], &[], &[]).unwrap();
        let class = compiled.class_mask();
        let instance = compiled.instance_mask();

        // Overlap resolves to the higher z-order mask regardless of the
        // input order (the low mask sorts first).
        assert_eq!(class[(0, 1)], 2);
        assert_eq!(class[(0, 0)], 1);
        assert_eq!(class[(0, 3)], 2);

        // Default instance ids are 1-based slots in z-order: the low mask
        // sorts first and takes slot 1, the high mask slot 2.
        assert_eq!(instance[(0, 0)], 1);
        assert_eq!(instance[(0, 1)], 2);
    }

    #[test]
    fn test_instance_ids_follow_input_order() {
        let a = left_mask().with_label(1);
        let b = right_mask().with_label(2);

        let compiled =
            CompiledMask::from_instance_masks(&[a, b], &[7, 9], &[]).unwrap();
        let labels = compiled.get_instance_labels();
        assert_eq!(labels[&7], 1);
        assert_eq!(labels[&9], 2);
    }

    #[test]
    fn test_zero_class_stays_background() {
        let unlabeled = left_mask(); // no label at all
        let labeled = right_mask().with_label(3);

        let compiled =
            CompiledMask::from_instance_masks(&[unlabeled, labeled], &[], &[]).unwrap();
        let class = compiled.class_mask();
        let instance = compiled.instance_mask();

        // The unlabeled mask's exclusive pixels stay background.
        assert_eq!(class[(0, 0)], 0);
        assert_eq!(instance[(0, 0)], 0);
        assert_eq!(class[(0, 3)], 3);
    }

    #[test]
    fn test_label_overrides_apply_positionally() {
        let a = left_mask().with_label(1);
        let b = right_mask().with_label(2);

        let compiled =
            CompiledMask::from_instance_masks(&[a, b], &[], &[4, 5]).unwrap();
        let labels = compiled.get_instance_labels();
        assert_eq!(labels, BTreeMap::from([(1, 4), (2, 5)]));
    }

    #[test]
    fn test_extract_and_lazy_extract() {
        let a = left_mask().with_label(1);
        let b = right_mask().with_label(2);
        let compiled = CompiledMask::from_instance_masks(&[a, b], &[], &[]).unwrap();

        let extracted = compiled.extract(2);
        assert!(extracted[(0, 3)]);
        assert!(!extracted[(0, 0)]);

        let lazy = compiled.lazy_extract(2);
        assert_eq!(*lazy.get(), extracted);
    }

    #[test]
    fn test_instance_count() {
        let a = left_mask().with_label(1);
        let b = right_mask().with_label(2);
        let compiled = CompiledMask::from_instance_masks(&[a, b], &[], &[]).unwrap();
        assert_eq!(compiled.instance_count(), 2);
    }

    #[test]
    fn test_empty_batch_has_no_compiled_mask() {
        assert!(CompiledMask::from_instance_masks(&[], &[], &[]).is_none());
    }

    #[test]
    fn test_rle_masks_merge_like_raw_masks() {
        let raw = left_mask().with_label(1);
        let rle = Mask::from_rle(crate::model::Rle::encode(&right_mask().image()))
            .with_label(2)
            .with_z_order(1);

        let compiled = CompiledMask::from_instance_masks(&[raw, rle], &[], &[]).unwrap();
        let class = compiled.class_mask();
        assert_eq!(class[(0, 1)], 2);
        assert_eq!(class[(0, 0)], 1);
    }
}
