//! Contact form submission
//!
//! The form posts its fields to the configured action URL and shows one of
//! three fixed status messages. Failures never escape `submit`.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ContactConfig;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub action: Url,
    pub fields: Vec<(String, String)>,
}

/// What the server answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOutcome {
    Accepted,
    Rejected { status: u16 },
}

/// Sends a submission over the network
///
/// `Err` means the request never got a response.
#[async_trait::async_trait]
pub trait FormTransport: Send + Sync {
    async fn send(&self, submission: &ContactSubmission) -> Result<TransportOutcome>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ContactConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl FormTransport for HttpTransport {
    async fn send(&self, submission: &ContactSubmission) -> Result<TransportOutcome> {
        let form = submission
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| form.text(name.clone(), value.clone()));

        let response = self
            .client
            .post(submission.action.clone())
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Contact form response");
        if status.is_success() {
            Ok(TransportOutcome::Accepted)
        } else {
            Ok(TransportOutcome::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Result shown under the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Sent,
    Failed,
    NetworkError,
}

impl FormStatus {
    pub fn message(self) -> &'static str {
        match self {
            FormStatus::Sent => "Сообщение отправлено!",
            FormStatus::Failed => "Не удалось отправить. Попробуйте позже.",
            FormStatus::NetworkError => "Ошибка сети. Попробуйте позже.",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            FormStatus::Sent => "success",
            FormStatus::Failed | FormStatus::NetworkError => "error",
        }
    }

    pub fn is_success(self) -> bool {
        self == FormStatus::Sent
    }
}

pub struct ContactForm<T: FormTransport> {
    transport: T,
    action: Url,
    fields: Vec<(String, String)>,
    status: Option<FormStatus>,
}

impl<T: FormTransport> ContactForm<T> {
    /// Fails with `Error::UrlParse` when `action` is not an absolute URL
    pub fn new(transport: T, action: &str) -> Result<Self> {
        let action = Url::parse(action)?;
        Ok(Self {
            transport,
            action,
            fields: Vec::new(),
            status: None,
        })
    }

    pub fn action(&self) -> &Url {
        &self.action
    }

    /// Set a field, replacing an existing value with the same name
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(field) => field.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Status currently shown; `None` while hidden
    pub fn status(&self) -> Option<FormStatus> {
        self.status
    }

    /// Send the form and show the outcome
    pub async fn submit(&mut self) -> FormStatus {
        self.status = None;

        let submission = ContactSubmission {
            action: self.action.clone(),
            fields: self.fields.clone(),
        };

        let status = match self.transport.send(&submission).await {
            Ok(TransportOutcome::Accepted) => {
                info!(action = %self.action, "Contact form sent");
                self.fields.clear();
                FormStatus::Sent
            }
            Ok(TransportOutcome::Rejected { status }) => {
                warn!(status, "Contact form rejected");
                FormStatus::Failed
            }
            Err(e) => {
                warn!(error = %e, "Contact form network error");
                FormStatus::NetworkError
            }
        };

        self.status = Some(status);
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    enum Reply {
        Accept,
        Reject(u16),
        Offline,
    }

    struct FakeTransport {
        reply: Reply,
        sent: Mutex<Vec<ContactSubmission>>,
    }

    impl FakeTransport {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl FormTransport for FakeTransport {
        async fn send(&self, submission: &ContactSubmission) -> Result<TransportOutcome> {
            self.sent.lock().unwrap().push(submission.clone());
            match self.reply {
                Reply::Accept => Ok(TransportOutcome::Accepted),
                Reply::Reject(status) => Ok(TransportOutcome::Rejected { status }),
                Reply::Offline => Err(Error::Other("connection refused".into())),
            }
        }
    }

    fn form(reply: Reply) -> ContactForm<FakeTransport> {
        let mut form =
            ContactForm::new(FakeTransport::new(reply), "https://formspree.io/f/abc").unwrap();
        form.set_field("name", "Ада");
        form.set_field("message", "Привет");
        form
    }

    #[tokio::test]
    async fn test_success_resets_fields() {
        let mut form = form(Reply::Accept);
        let status = form.submit().await;

        assert_eq!(status, FormStatus::Sent);
        assert_eq!(status.message(), "Сообщение отправлено!");
        assert_eq!(status.css_class(), "success");
        assert!(form.fields().is_empty());
        assert_eq!(form.status(), Some(FormStatus::Sent));

        let sent = form.transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].fields[0], ("name".to_string(), "Ада".to_string()));
    }

    #[tokio::test]
    async fn test_rejected_keeps_fields() {
        let mut form = form(Reply::Reject(422));
        let status = form.submit().await;

        assert_eq!(status, FormStatus::Failed);
        assert_eq!(status.message(), "Не удалось отправить. Попробуйте позже.");
        assert_eq!(status.css_class(), "error");
        assert_eq!(form.field("message"), Some("Привет"));
    }

    #[tokio::test]
    async fn test_network_error_is_not_propagated() {
        let mut form = form(Reply::Offline);
        let status = form.submit().await;

        assert_eq!(status, FormStatus::NetworkError);
        assert_eq!(status.message(), "Ошибка сети. Попробуйте позже.");
        assert_eq!(form.status(), Some(FormStatus::NetworkError));
        assert_eq!(form.fields().len(), 2);
    }

    #[test]
    fn test_invalid_action_rejected_up_front() {
        let result = ContactForm::new(FakeTransport::new(Reply::Accept), "not a url");
        assert!(matches!(result, Err(Error::UrlParse(_))));
    }

    #[test]
    fn test_set_field_replaces() {
        let mut form = form(Reply::Accept);
        form.set_field("name", "Грейс");
        assert_eq!(form.field("name"), Some("Грейс"));
        assert_eq!(form.fields().len(), 2);
    }

    /// Answer one request with `status_line` and hand back what was received
    async fn serve_once(status_line: &'static str) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                // multipart bodies end with the closing boundary
                let text = String::from_utf8_lossy(&received);
                if text.contains("\r\n\r\n") && text.trim_end().ends_with("--") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&received).to_lowercase()
        });
        let url = Url::parse(&format!("http://{}/f/abc", addr)).unwrap();
        (url, handle)
    }

    fn submission(action: Url) -> ContactSubmission {
        ContactSubmission {
            action,
            fields: vec![("email".into(), "ada@example.com".into())],
        }
    }

    #[tokio::test]
    async fn test_http_transport_posts_multipart_json() {
        let (url, server) = serve_once("200 OK").await;
        let transport = HttpTransport::new(&ContactConfig::default()).unwrap();

        let outcome = transport.send(&submission(url)).await.unwrap();
        assert_eq!(outcome, TransportOutcome::Accepted);

        let request = server.await.unwrap();
        assert!(request.starts_with("post /f/abc "));
        assert!(request.contains("accept: application/json"));
        assert!(request.contains("content-type: multipart/form-data"));
        assert!(request.contains("name=\"email\""));
        assert!(request.contains("ada@example.com"));
    }

    #[tokio::test]
    async fn test_http_transport_maps_error_status() {
        let (url, server) = serve_once("422 Unprocessable Entity").await;
        let transport = HttpTransport::new(&ContactConfig::default()).unwrap();

        let outcome = transport.send(&submission(url)).await.unwrap();
        assert_eq!(outcome, TransportOutcome::Rejected { status: 422 });
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_transport_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(&ContactConfig::default()).unwrap();
        let url = Url::parse(&format!("http://{}/f/abc", addr)).unwrap();
        let result = transport.send(&submission(url)).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
