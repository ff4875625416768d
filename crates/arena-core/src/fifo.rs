use std::collections::VecDeque;

/// Appends `items` to `buffer`, evicting from the front so that at most
/// `capacity` entries remain, oldest first.
///
/// When `items` alone fills the capacity the previous contents are discarded
/// and only the last `capacity` items are kept. A buffer that is already over
/// capacity is trimmed back down by the same rule.
pub fn push_fifo<T, I>(buffer: &mut VecDeque<T>, capacity: usize, items: I)
where
    I: IntoIterator<Item = T>,
    I::IntoIter: ExactSizeIterator,
{
    let items = items.into_iter();
    let incoming = items.len();

    if buffer.len() + incoming < capacity {
        buffer.extend(items);
        return;
    }

    if incoming >= capacity {
        buffer.clear();
        buffer.extend(items.skip(incoming - capacity));
        return;
    }

    let remove = buffer.len() + incoming - capacity;
    buffer.drain(..remove);
    buffer.extend(items);
}

/// Capacity-bounded trailing window, oldest entry first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedWindow<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> BoundedWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes one entry, evicting the oldest when full.
    pub fn push(&mut self, item: T) {
        push_fifo(&mut self.items, self.capacity, std::iter::once(item));
    }

    /// Pushes a batch of entries in order.
    pub fn push_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        push_fifo(&mut self.items, self.capacity, items);
    }

    /// Most recently pushed entry.
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
