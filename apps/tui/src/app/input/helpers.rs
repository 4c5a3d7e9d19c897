/// Moves `index` one step through `len` entries, wrapping at both ends.
pub const fn wrap_step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }

    if forward {
        (index + 1) % len
    } else if index == 0 {
        len - 1
    } else {
        (index - 1) % len
    }
}
