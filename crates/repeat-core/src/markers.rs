//! Named time markers
//!
//! Markers are keyed by a PCM byte offset and addressed through stable
//! [`MarkerId`] handles, so hit targets and the hover/edit references stay
//! valid when the collection is re-sorted. Deletion is two-phase: handlers
//! only flag a marker dead, and [`MarkerStore::compact`] removes the dead
//! ones once per frame after all input has been processed.

/// Default maximum number of markers
pub const DEFAULT_MARKER_LIMIT: usize = 100;

/// Stable handle to a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u32);

impl MarkerId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    /// Byte offset into the PCM stream
    pub timestamp_pcm: i64,
    pub name: String,
    is_dead: bool,
}

impl Marker {
    pub fn is_dead(&self) -> bool {
        self.is_dead
    }
}

#[derive(Debug)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    limit: usize,
    pcm_len: i64,
    next_id: u32,
    editing: Option<MarkerId>,
    hovering: Option<MarkerId>,
}

impl MarkerStore {
    pub fn new(pcm_len: i64, limit: usize) -> Self {
        Self {
            markers: Vec::with_capacity(limit),
            limit,
            pcm_len,
            next_id: 0,
            editing: None,
            hovering: None,
        }
    }

    /// Append an unnamed marker; `None` once the limit is reached
    pub fn create(&mut self, timestamp_pcm: i64) -> Option<MarkerId> {
        if self.markers.len() >= self.limit {
            log::debug!("MarkerStore: limit of {} reached, marker not created", self.limit);
            return None;
        }
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.push(Marker {
            id,
            timestamp_pcm: timestamp_pcm.clamp(0, self.pcm_len),
            name: String::new(),
            is_dead: false,
        });
        Some(id)
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    fn get_mut(&mut self, id: MarkerId) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id == id)
    }

    pub fn rename(&mut self, id: MarkerId, name: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(marker) => {
                marker.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Move a marker, clamped into the stream
    pub fn set_timestamp(&mut self, id: MarkerId, timestamp_pcm: i64) -> bool {
        let pcm_len = self.pcm_len;
        match self.get_mut(id) {
            Some(marker) => {
                marker.timestamp_pcm = timestamp_pcm.clamp(0, pcm_len);
                true
            }
            None => false,
        }
    }

    /// Flag a marker dead; it stays in the collection until [`compact`](Self::compact)
    pub fn soft_delete(&mut self, id: MarkerId) -> bool {
        match self.get_mut(id) {
            Some(marker) => {
                marker.is_dead = true;
                true
            }
            None => false,
        }
    }

    /// Drop dead markers and any hover/edit reference to them
    pub fn compact(&mut self) -> usize {
        let before = self.markers.len();
        self.markers.retain(|m| !m.is_dead);
        let removed = before - self.markers.len();
        if removed > 0 {
            if self.editing.is_some_and(|id| self.get(id).is_none()) {
                self.editing = None;
            }
            if self.hovering.is_some_and(|id| self.get(id).is_none()) {
                self.hovering = None;
            }
            log::debug!("MarkerStore: compacted {} dead marker(s)", removed);
        }
        removed
    }

    /// Markers latest-first, sorting in place only when out of order
    ///
    /// The sort is stable, so equal timestamps keep insertion order.
    pub fn sorted_by_time_descending(&mut self) -> &[Marker] {
        let sorted = self
            .markers
            .windows(2)
            .all(|w| w[0].timestamp_pcm >= w[1].timestamp_pcm);
        if !sorted {
            self.markers
                .sort_by(|a, b| b.timestamp_pcm.cmp(&a.timestamp_pcm));
        }
        &self.markers
    }

    /// Live markers earliest-first
    pub fn ascending(&self) -> Vec<&Marker> {
        let mut live: Vec<&Marker> = self.markers.iter().filter(|m| !m.is_dead).collect();
        live.sort_by_key(|m| m.timestamp_pcm);
        live
    }

    // -------------------------------------------------------------------------
    // Edit / hover references
    // -------------------------------------------------------------------------

    pub fn start_edit(&mut self, id: MarkerId) {
        self.editing = Some(id);
    }

    pub fn stop_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<MarkerId> {
        self.editing
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Hover a marker unless another one already holds the hover
    pub fn start_hover(&mut self, id: MarkerId) {
        if self.hovering.is_none() {
            self.hovering = Some(id);
        }
    }

    pub fn stop_hover(&mut self) {
        self.hovering = None;
    }

    pub fn hovering(&self) -> Option<MarkerId> {
        self.hovering
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MarkerStore {
        MarkerStore::new(1_764_000, DEFAULT_MARKER_LIMIT)
    }

    #[test]
    fn test_create_clamps_timestamp() {
        let mut markers = store();
        let early = markers.create(-50).unwrap();
        let late = markers.create(9_999_999).unwrap();
        assert_eq!(markers.get(early).unwrap().timestamp_pcm, 0);
        assert_eq!(markers.get(late).unwrap().timestamp_pcm, 1_764_000);
        assert!(markers.get(early).unwrap().name.is_empty());
    }

    #[test]
    fn test_cap_rejects_101st_marker() {
        let mut markers = store();
        for i in 0..100 {
            assert!(markers.create(i * 4).is_some(), "marker {} should fit", i);
        }
        assert_eq!(markers.create(400_000), None);
        assert_eq!(markers.len(), 100, "collection unchanged");
        assert!(markers.ascending().iter().all(|m| m.timestamp_pcm != 400_000));
    }

    #[test]
    fn test_soft_delete_then_compact() {
        let mut markers = store();
        let keep = markers.create(1_000).unwrap();
        let doomed = markers.create(2_000).unwrap();
        markers.start_hover(doomed);
        markers.start_edit(doomed);

        assert!(markers.soft_delete(doomed));
        let listed = markers.sorted_by_time_descending();
        let entry = listed.iter().find(|m| m.id == doomed).expect("still present before compaction");
        assert!(entry.is_dead());

        assert_eq!(markers.compact(), 1);
        assert!(markers.sorted_by_time_descending().iter().all(|m| m.id != doomed));
        assert!(markers.get(keep).is_some());
        assert_eq!(markers.hovering(), None, "hover cleared with the marker");
        assert_eq!(markers.editing(), None, "edit cleared with the marker");
    }

    #[test]
    fn test_sorted_descending_is_stable() {
        let mut markers = store();
        let a = markers.create(500).unwrap();
        let b = markers.create(900).unwrap();
        let c = markers.create(500).unwrap();
        let order: Vec<MarkerId> = markers.sorted_by_time_descending().iter().map(|m| m.id).collect();
        assert_eq!(order, vec![b, a, c], "ties keep insertion order");

        let asc: Vec<MarkerId> = markers.ascending().iter().map(|m| m.id).collect();
        assert_eq!(asc, vec![a, c, b]);
    }

    #[test]
    fn test_ids_survive_resorting() {
        let mut markers = store();
        let first = markers.create(100).unwrap();
        markers.create(200).unwrap();
        markers.rename(first, "intro");
        markers.sorted_by_time_descending();
        assert_eq!(markers.get(first).unwrap().name, "intro");
        assert!(markers.set_timestamp(first, 5_000_000));
        assert_eq!(markers.get(first).unwrap().timestamp_pcm, 1_764_000);
    }

    #[test]
    fn test_hover_is_single_owner() {
        let mut markers = store();
        let a = markers.create(10).unwrap();
        let b = markers.create(20).unwrap();
        markers.start_hover(a);
        markers.start_hover(b);
        assert_eq!(markers.hovering(), Some(a));
        markers.stop_hover();
        markers.start_hover(b);
        assert_eq!(markers.hovering(), Some(b));
    }
}
