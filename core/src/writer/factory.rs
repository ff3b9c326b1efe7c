use crate::mapper::JsonMapper;
use crate::writer::{ObjectWriter, StreamSettings};
use std::sync::Arc;

/// Default writer of `mapper`, with the stream settings [`set_necessary_stream_config`] applies.
pub fn create_default_writer(mapper: &Arc<JsonMapper>) -> ObjectWriter {
  set_necessary_stream_config(mapper.writer())
}

/// Stops `writer` from flushing or closing the target on its own, so that the response stream
/// is only finalized by the body writer after a successful write. Returns `writer` itself when
/// nothing needs to change.
pub fn set_necessary_stream_config(writer: ObjectWriter) -> ObjectWriter {
  if writer.stream_settings() == StreamSettings::MANAGED {
    return writer;
  }
  writer.with_stream_settings(StreamSettings::MANAGED)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mapper::MapperOption;

  #[test]
  fn test_default_writer_leaves_stream_to_caller() {
    let mapper = Arc::new(JsonMapper::from_options([MapperOption::with_pretty_print(true)]));
    let writer = create_default_writer(&mapper);
    assert_eq!(writer.stream_settings(), StreamSettings::MANAGED);
    assert!(writer.is_pretty_print());
  }

  #[test]
  fn test_already_managed_writer_is_returned_as_is() {
    let mapper = Arc::new(JsonMapper::from_options([
      MapperOption::with_auto_close_target(false),
      MapperOption::with_flush_passed_to_stream(false),
    ]));
    let writer = mapper.writer();
    let managed = set_necessary_stream_config(writer.clone());
    assert!(ObjectWriter::ptr_eq(&writer, &managed));
  }
}
