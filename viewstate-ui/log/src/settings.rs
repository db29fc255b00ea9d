/// Sizing options for log surfaces.
#[derive(Default, Clone, Debug)]
pub struct LogSettings {
    /// Lines kept by a [`MemoryLog`](crate::MemoryLog) (`None` keeps all).
    pub max_lines: Option<usize>,
    /// Capacity of a [`ChannelLog`](crate::ChannelLog) (`None` means
    /// unbounded).
    pub channel_capacity: Option<usize>,
}

impl LogSettings {
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity);
        self
    }
}
