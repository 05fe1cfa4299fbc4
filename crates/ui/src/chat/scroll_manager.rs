use gpui::{Pixels, ScrollHandle, px};

/// Distance from the tail within which the transcript keeps following new rows.
const FOLLOW_THRESHOLD: Pixels = px(24.);
/// Ignores sub-pixel jitter between frames.
const SCROLL_DELTA_EPSILON: f32 = 1.0;

/// Keeps the transcript pinned to its newest row unless the user scrolled up.
pub struct ScrollManager {
    scroll_handle: ScrollHandle,
    pending_scroll_to_bottom: bool,
    follow_bottom: bool,
    last_scroll_offset: Pixels,
    last_max_offset: Pixels,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            scroll_handle: ScrollHandle::new(),
            pending_scroll_to_bottom: false,
            follow_bottom: true,
            last_scroll_offset: Pixels::ZERO,
            last_max_offset: Pixels::ZERO,
        }
    }

    pub fn handle(&self) -> &ScrollHandle {
        &self.scroll_handle
    }

    pub fn is_following_bottom(&self) -> bool {
        self.follow_bottom
    }

    /// Called when rows were appended; scrolls on the next frame if following.
    pub fn request_scroll_to_bottom_if_following(&mut self) {
        if self.follow_bottom || self.was_near_bottom() {
            self.pending_scroll_to_bottom = true;
        }
    }

    pub fn update_follow_state(&mut self) {
        let offset = self.scroll_handle.offset().y;
        let max_offset = self.scroll_handle.max_offset().height;
        self.observe(offset, max_offset);
    }

    /// Folds one frame's scroll position into the follow state.
    ///
    /// Growth of the content alone never pauses following; only a scroll towards the top
    /// with an unchanged content size does.
    fn observe(&mut self, offset: Pixels, max_offset: Pixels) {
        let offset_delta = f32::from(offset) - f32::from(self.last_scroll_offset);
        let max_delta = (f32::from(max_offset) - f32::from(self.last_max_offset)).abs();
        let content_size_changed = max_delta > SCROLL_DELTA_EPSILON;
        let user_scrolled_up = offset_delta > SCROLL_DELTA_EPSILON && !content_size_changed;
        let user_scrolled_down = offset_delta < -SCROLL_DELTA_EPSILON && !content_size_changed;

        if self.pending_scroll_to_bottom || (content_size_changed && self.was_near_bottom()) {
            self.follow_bottom = true;
        } else if self.follow_bottom {
            if user_scrolled_up {
                self.follow_bottom = false;
            }
        } else if user_scrolled_down && is_near_bottom(offset, max_offset) {
            self.follow_bottom = true;
        }

        self.last_scroll_offset = offset;
        self.last_max_offset = max_offset;
    }

    /// Queues a scroll to the tail. The handle resolves it at prepaint, after the
    /// appended rows have been laid out.
    pub fn apply_pending_scroll(&mut self) -> bool {
        let should_scroll = self.follow_bottom || self.pending_scroll_to_bottom;
        if should_scroll {
            self.scroll_handle.scroll_to_bottom();
        }

        self.pending_scroll_to_bottom = false;
        should_scroll
    }

    fn was_near_bottom(&self) -> bool {
        is_near_bottom(self.last_scroll_offset, self.last_max_offset)
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_near_bottom(offset: Pixels, max_offset: Pixels) -> bool {
    if max_offset <= Pixels::ZERO {
        return true;
    }

    // Scrolling down is a negative Y offset, so `offset + max` approaches 0 at the tail.
    (offset + max_offset).abs() <= FOLLOW_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A `text_sm` row plus the column gap.
    const ROW_HEIGHT: Pixels = px(28.);

    #[test]
    fn content_shorter_than_viewport_counts_as_bottom() {
        assert!(is_near_bottom(px(0.), px(0.)));
    }

    #[test]
    fn tail_and_threshold_band_count_as_bottom() {
        assert!(is_near_bottom(px(-400.), px(400.)));
        assert!(is_near_bottom(px(-380.), px(400.)));
        assert!(!is_near_bottom(px(-200.), px(400.)));
        assert!(!is_near_bottom(px(0.), px(400.)));
    }

    #[test]
    fn new_manager_follows_and_scrolls_every_frame() {
        let mut manager = ScrollManager::new();

        assert!(manager.is_following_bottom());
        assert!(manager.apply_pending_scroll());
    }

    #[test]
    fn appended_row_below_viewport_keeps_following() {
        let mut manager = ScrollManager::new();
        manager.observe(px(-400.), px(400.));
        assert!(manager.is_following_bottom());

        // The new row is laid out before the scroll to the tail has landed.
        manager.request_scroll_to_bottom_if_following();
        manager.observe(px(-400.), px(400.) + ROW_HEIGHT);
        assert!(manager.is_following_bottom());

        // A later frame, e.g. a draft keystroke, with the offset still one row short.
        manager.observe(px(-400.), px(400.) + ROW_HEIGHT);
        assert!(manager.is_following_bottom());
        assert!(manager.apply_pending_scroll());
    }

    #[test]
    fn scrolling_up_pauses_and_returning_to_tail_resumes() {
        let mut manager = ScrollManager::new();
        manager.observe(px(-400.), px(400.));

        manager.observe(px(-200.), px(400.));
        assert!(!manager.is_following_bottom());
        assert!(!manager.apply_pending_scroll());

        // Rows appended while reading history do not pull the pane down.
        manager.request_scroll_to_bottom_if_following();
        manager.observe(px(-200.), px(400.) + ROW_HEIGHT);
        assert!(!manager.apply_pending_scroll());
        assert!(!manager.is_following_bottom());

        manager.observe(px(-420.), px(400.) + ROW_HEIGHT);
        assert!(manager.is_following_bottom());
    }
}
