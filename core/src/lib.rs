//! Transport-agnostic contract for REST calls.
//!
//! # Overview
//! Callers describe a call with an immutable `RequestDescriptor`, describe
//! the expected result with an `ObjectType`, and hand both to a
//! `RequestExecutor` together with the status code that means success.
//! Every failure surfaces as one `RestError` kind: usage, transport,
//! unsuccessful response or deserialization.
//!
//! # Design
//! - Descriptors and object types are plain values; they are `Send + Sync`
//!   and can be built once and reused from any thread.
//! - `RestClient` is the reference executor. It splits each call into
//!   `build_request` (descriptor to `HttpRequest`) and `parse_*` (from
//!   `HttpResponse`) around an `HttpTransport`, so the I/O boundary is
//!   explicit and any HTTP library can be plugged in.
//! - Base URLs and default headers live in a `ServiceRegistry` keyed by the
//!   service marker type, never in the descriptor.
//! - Validation, composite value encoding and custom header filtering are
//!   separate capabilities with reference implementations.
//!
//! ```
//! use restcall_core::{
//!     ContentType, HttpMethod, HttpRequest, HttpResponse, ObjectType, RequestDescriptor,
//!     RequestExecutor, RestClient, RestError, ServiceConfig, ServiceRegistry,
//! };
//!
//! enum Greetings {}
//!
//! let transport = |request: HttpRequest| -> Result<HttpResponse, RestError> {
//!     assert_eq!(request.url, "http://greetings.local/hello?name=Ada");
//!     Ok(HttpResponse { status: 200, headers: Vec::new(), body: "\"Hello, Ada\"".into() })
//! };
//! let client = RestClient::new(
//!     ServiceRegistry::new().with::<Greetings>(ServiceConfig::new("http://greetings.local")),
//!     transport,
//! );
//!
//! let request = RequestDescriptor::builder::<Greetings>(HttpMethod::Get, ContentType::Json)
//!     .set_path("/hello")
//!     .set_query_parameter("name", ["Ada"])?
//!     .build();
//! let greeting: String =
//!     client.execute_single_result(&request, 200, &ObjectType::single::<String>())?;
//! assert_eq!(greeting, "Hello, Ada");
//! # Ok::<(), RestError>(())
//! ```

pub mod client;
pub mod composite;
pub mod config;
pub mod error;
pub mod executor;
pub mod header_filter;
pub mod http;
pub mod object_type;
pub mod param;
pub mod request;
pub mod transport;
pub mod type_token;
pub mod validation;

pub use client::RestClient;
pub use composite::{CompositeTypeCodec, JsonCompositeCodec};
pub use config::{ServiceConfig, ServiceRegistry};
pub use error::{Problem, RestError, Result};
pub use executor::{CollectionKind, RequestExecutor, ResultCollection};
pub use header_filter::{AllowListHeaderFilter, CustomHeaderFilter};
pub use http::{ContentType, HttpMethod, HttpRequest, HttpResponse};
pub use object_type::{GenericType, ObjectType, ParameterizedObjectType, ReifiedObjectType, SingleObjectType};
pub use param::{Displayed, ParamValue};
pub use request::{RequestBuilder, RequestDescriptor, ServiceMarker};
pub use transport::HttpTransport;
pub use type_token::{TypeDescriptor, TypeToken};
pub use validation::{ValidationExecutor, ValidatorExecutor};
