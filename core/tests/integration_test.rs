use nexus_rest_json_rs::*;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Debug, Default)]
struct ResponseBody {
  bytes: Vec<u8>,
  closed: bool,
}

impl Write for ResponseBody {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.bytes.write(buf)
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl ResponseOutput for ResponseBody {
  fn close(&mut self) -> io::Result<()> {
    self.closed = true;
    Ok(())
  }
}

struct Request {
  body: ResponseBody,
  media_type: Option<MediaType>,
  resource_info: Option<ResourceInfo>,
}

impl Request {
  fn to(method_id: &str, resource_class: &str) -> Self {
    Self {
      body: ResponseBody::default(),
      media_type: Some(MediaType::application_json()),
      resource_info: Some(ResourceInfo::new(method_id, resource_class)),
    }
  }

  fn body(&self) -> &str {
    std::str::from_utf8(&self.body.bytes).unwrap()
  }
}

impl ServerRequestContext for Request {
  fn get_or_create_output_stream(&mut self) -> &mut dyn ResponseOutput {
    &mut self.body
  }

  fn response_media_type(&self) -> Option<&MediaType> {
    self.media_type.as_ref()
  }

  fn resource_info(&self) -> Option<&ResourceInfo> {
    self.resource_info.as_ref()
  }
}

struct JsonOnlyProviders {
  mapper: Arc<JsonMapper>,
}

impl Providers for JsonOnlyProviders {
  fn get_context_resolver(&self, media_type: Option<&MediaType>) -> Option<Arc<dyn MapperContextResolver>> {
    if media_type.map(MediaType::essence).as_deref() != Some("application/json") {
      return None;
    }
    let mapper = self.mapper.clone();
    let resolver = move |runtime_type: &RuntimeType| runtime_type.is::<Order>().then(|| mapper.clone());
    Some(Arc::new(resolver))
  }
}

#[derive(Debug, Serialize)]
struct Order {
  id: u32,
  customer: Option<String>,
  note: String,
}

#[derive(Debug, Serialize)]
struct Invoice {
  number: String,
}

#[derive(Default)]
struct EnvelopeStrategy;

impl WriterStrategy for EnvelopeStrategy {
  fn create_writer(&self, mapper: &Arc<JsonMapper>, generic_type: &GenericType) -> Result<ObjectWriter, StrategyError> {
    Ok(mapper.writer().with_root_name(generic_type.effective_type().simple_name().to_lowercase()))
  }
}

fn summary() -> JsonView {
  JsonView::new("Summary")
}

fn body_writer() -> (JsonMessageBodyWriter, Arc<JsonMapper>) {
  let negotiated = Arc::new(JsonMapper::from_options([MapperOption::with_include_nulls(false)]));

  let mut metadata = SerializationMetadata::new();
  metadata
    .register_custom_serialization_for_class::<EnvelopeStrategy>("shop::InvoiceResource")
    .set_json_view_for_method("shop::OrderResource#summary", summary());
  metadata.views_mut().register_type::<Order>([
    FieldView::new("id").in_views([summary()]),
    FieldView::new("note").in_views([JsonView::new("Detail")]),
  ]);

  let body_writer = JsonMessageBodyWriter::new(
    Arc::new(JsonMapper::new()),
    Arc::new(JsonOnlyProviders {
      mapper: negotiated.clone(),
    }),
    Arc::new(metadata),
  );
  (body_writer, negotiated)
}

#[test]
fn test_negotiated_mapper_drops_nulls() {
  let (body_writer, negotiated) = body_writer();
  let order = Order {
    id: 1,
    customer: None,
    note: "leave at door".to_string(),
  };

  let mut request = Request::to("shop::OrderResource#get", "shop::OrderResource");
  body_writer
    .write_response(&order, &GenericType::of::<Order>(), &mut request)
    .unwrap();

  assert_eq!(request.body(), r#"{"id":1,"note":"leave at door"}"#);
  assert!(request.body.closed);
  assert!(body_writer.cached_mapper_writer(negotiated.id()).is_some());
}

#[test]
fn test_strategy_and_view_per_resource() {
  let (body_writer, _) = body_writer();

  let mut invoice_request = Request::to("shop::InvoiceResource#get", "shop::InvoiceResource");
  body_writer
    .write_response(
      &vec![Invoice {
        number: "A-1".to_string(),
      }],
      &GenericType::of::<Vec<Invoice>>(),
      &mut invoice_request,
    )
    .unwrap();
  assert_eq!(invoice_request.body(), r#"{"invoice":[{"number":"A-1"}]}"#);
  assert!(body_writer
    .cached_type_writer(std::any::type_name::<Invoice>())
    .is_some());

  let order = Order {
    id: 2,
    customer: None,
    note: "n".to_string(),
  };
  let mut default_request = Request::to("shop::OrderResource#summary", "shop::OrderResource");
  default_request.media_type = None;
  body_writer
    .write_response(&order, &GenericType::of::<Order>(), &mut default_request)
    .unwrap();
  assert_eq!(default_request.body(), r#"{"customer":null,"id":2}"#);

  let mut negotiated_request = Request::to("shop::OrderResource#summary", "shop::OrderResource");
  body_writer
    .write_response(&order, &GenericType::of::<Order>(), &mut negotiated_request)
    .unwrap();
  assert_eq!(negotiated_request.body(), r#"{"id":2}"#);
}

#[test]
fn test_legacy_write_sets_content_type_and_keeps_stream_open() {
  let (body_writer, _) = body_writer();
  let mut headers = HttpHeaders::new();
  let mut body = ResponseBody::default();

  body_writer
    .write_to(&Invoice { number: "B-2".to_string() }, &[], &mut headers, &mut body)
    .unwrap();

  assert_eq!(headers.get(CONTENT_TYPE), Some(&vec!["application/json".to_string()]));
  assert_eq!(std::str::from_utf8(&body.bytes).unwrap(), r#"{"number":"B-2"}"#);
  assert!(!body.closed);
}
