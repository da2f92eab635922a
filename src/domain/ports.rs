use crate::utils::error::Result;

/// Lazy sequence of records produced by [`InputHandler::iter_input`].
pub type RecordIter<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// A source of records.
///
/// Failures are logged at error level by the implementation and then
/// returned, so the caller can abort.
pub trait InputHandler {
    type Record;
    type AllInput;

    /// Opens the source and returns a single-pass sequence over it.
    /// Calling again starts a fresh sequence from the beginning of the source.
    fn iter_input(&mut self) -> Result<RecordIter<'_, Self::Record>>;

    /// Reads the whole source in one go.
    fn get_all_input(&mut self) -> Result<Self::AllInput>;
}

/// A buffered sink of records.
///
/// `write_output` never fails from the caller's point of view: write errors
/// are logged and the buffer is emptied either way.
pub trait OutputHandler {
    type Record;

    fn save_to_buffer(&mut self, record: Self::Record);

    fn write_output(&mut self);

    /// Records saved since the last flush.
    fn buffered(&self) -> &[Self::Record];
}
