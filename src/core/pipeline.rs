use crate::core::{InputHandler, OutputHandler, Result};

/// Drains one input handler into one output handler, then flushes once.
pub struct Pipeline<I, O> {
    input: I,
    output: O,
}

impl<I, O> Pipeline<I, O>
where
    I: InputHandler,
    O: OutputHandler<Record = I::Record>,
{
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Returns how many records were buffered and handed to the flush.
    ///
    /// An input error stops the run before anything is flushed.
    pub fn run(&mut self) -> Result<usize> {
        tracing::info!("Starting pipeline run");

        let mut count = 0;
        for record in self.input.iter_input()? {
            self.output.save_to_buffer(record?);
            count += 1;
        }
        tracing::debug!("Read {} records", count);

        self.output.write_output();
        tracing::info!("Pipeline finished, {} records processed", count);
        Ok(count)
    }

    pub fn into_output(self) -> O {
        self.output
    }
}
