use std::io;
use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use tokio::runtime::{Builder, Handle, Runtime};

use super::model::ContactForm;
use super::transport::{
    CONTACT_ENDPOINT, MessageTransport, SubmitError, TransportFuture, interpret_response,
};

/// Posts contact messages as JSON to the site backend.
///
/// reqwest needs a Tokio reactor, which neither gpui's executor nor
/// `futures::executor` provide. Requests are therefore spawned onto a Tokio
/// runtime and the transport future only awaits the join handle.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    handle: Handle,
    // Keeps an owned runtime alive for as long as any clone of the transport.
    _runtime: Option<Arc<Runtime>>,
}

impl HttpTransport {
    /// `base_url` is the site origin, e.g. `https://starkmind.io`.
    ///
    /// Reuses the ambient Tokio runtime when called inside one; otherwise
    /// starts a single-worker runtime owned by the transport.
    pub fn new(base_url: impl AsRef<str>) -> io::Result<Self> {
        let (handle, runtime) = match Handle::try_current() {
            Ok(handle) => (handle, None),
            Err(_) => {
                let runtime = Builder::new_multi_thread()
                    .worker_threads(1)
                    .thread_name("starkmind-http")
                    .enable_all()
                    .build()?;
                (runtime.handle().clone(), Some(Arc::new(runtime)))
            }
        };
        let mut transport = Self::with_client(reqwest::Client::new(), handle, base_url);
        transport._runtime = runtime;
        Ok(transport)
    }

    /// Uses a caller-provided client and runtime handle.
    pub fn with_client(
        client: reqwest::Client,
        handle: Handle,
        base_url: impl AsRef<str>,
    ) -> Self {
        let base = base_url.as_ref().trim_end_matches('/');
        Self {
            client,
            url: format!("{base}{CONTACT_ENDPOINT}"),
            handle,
            _runtime: None,
        }
    }

    /// Replaces the full endpoint URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }

    fn build_request(&self, message: &ContactForm) -> Result<reqwest::Request, SubmitError> {
        self.client
            .post(&self.url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(message)
            .build()
            .map_err(|error| SubmitError::Transport(error.to_string()))
    }
}

impl MessageTransport for HttpTransport {
    fn send<'a>(&'a self, message: &'a ContactForm) -> TransportFuture<'a> {
        Box::pin(async move {
            let request = self.build_request(message)?;
            tracing::debug!(url = %request.url(), "posting contact message");
            let client = self.client.clone();
            let exchange = self.handle.spawn(async move {
                let response = client.execute(request).await?;
                let status = response.status().as_u16();
                let body = response.bytes().await?;
                Ok::<_, reqwest::Error>((status, body))
            });
            let (status, body) = exchange
                .await
                .map_err(|error| SubmitError::Transport(error.to_string()))?
                .map_err(|error| SubmitError::Transport(error.to_string()))?;
            interpret_response(status, &body)
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    fn unbound_base() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        assert_eq!(
            HttpTransport::new("https://starkmind.io/").unwrap().endpoint(),
            "https://starkmind.io/api/send-email"
        );
    }

    #[test]
    fn request_is_json_post_with_full_body() {
        let transport = HttpTransport::new("http://localhost:5000").unwrap();
        let form = ContactForm {
            name: "Jo".into(),
            email: "a@b.com".into(),
            message: "this is long enough".into(),
            ..ContactForm::default()
        };
        let request = transport.build_request(&form).expect("request builds");

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/api/send-email");
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(request.headers()[ACCEPT], "application/json");

        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .expect("json body is buffered");
        let decoded: ContactForm = serde_json::from_slice(body).expect("body decodes");
        assert_eq!(decoded, form);
    }

    #[test]
    fn invalid_url_surfaces_as_transport_error() {
        let transport = HttpTransport::new("").unwrap().url("not a url");
        let error = transport
            .build_request(&ContactForm::default())
            .expect_err("relative url cannot be requested");
        assert!(matches!(error, SubmitError::Transport(_)));
    }

    #[test]
    fn refused_connection_is_transport_error_outside_tokio() {
        let transport = HttpTransport::new(unbound_base()).unwrap();
        let result = block_on(transport.send(&ContactForm::default()));
        assert!(matches!(result, Err(SubmitError::Transport(_))), "{result:?}");
    }

    #[test]
    fn injected_handle_drives_the_request() {
        let runtime = Builder::new_current_thread().enable_all().build().unwrap();
        let transport = HttpTransport::with_client(
            reqwest::Client::new(),
            runtime.handle().clone(),
            unbound_base(),
        );
        // A current-thread runtime only makes progress while it is blocked on.
        let result = runtime.block_on(transport.send(&ContactForm::default()));
        assert!(matches!(result, Err(SubmitError::Transport(_))), "{result:?}");
    }
}
