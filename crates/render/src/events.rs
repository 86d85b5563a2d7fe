use foundation::ids::PointId;

/// Notifications for the host UI, emitted at most once per tick each and
/// only when the value changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    HoverChanged(Option<PointId>),
    VisibleCountChanged(usize),
}
