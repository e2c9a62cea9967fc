use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::builder::PolicyBuilder;
use crate::config::AuthorizerConfig;
use crate::error::AuthorizerError;
use crate::types::{AuthorizerRequest, Credential, PolicyDocument, ResourceReference};

/// Principal placed in every issued document.
pub const PRINCIPAL_ID: &str = "*";

const WILDCARD: &str = "*";

/// Outcome of one authorization attempt.
///
/// `Unauthorized` carries no reason: a header that cannot be
/// decoded and a wrong password look the same to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allow(PolicyDocument),
    Unauthorized,
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow(_))
    }

    pub fn policy(&self) -> Option<&PolicyDocument> {
        match self {
            AuthorizationDecision::Allow(document) => Some(document),
            AuthorizationDecision::Unauthorized => None,
        }
    }
}

impl Display for AuthorizationDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AuthorizationDecision::Allow(document) => write!(
                f,
                "Allow(principal={}; statements={})",
                document.principal_id,
                document.statements().len()
            ),
            AuthorizationDecision::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

/// The decision handler. Cheap to share across threads; holds only the
/// expected credential.
#[derive(Debug, Clone)]
pub struct Authorizer {
    expected: Credential,
}

impl Authorizer {
    pub fn new(expected: Credential) -> Self {
        Self { expected }
    }

    pub fn from_config(config: &AuthorizerConfig) -> Self {
        Self::new(config.expected.clone())
    }

    pub fn authorize(
        &self,
        request: &AuthorizerRequest,
    ) -> Result<AuthorizationDecision, AuthorizerError> {
        self.authorize_header(
            request.authorization().map(str::as_bytes),
            &request.method_arn,
        )
    }

    /// Decide for a raw header value and method ARN.
    ///
    /// Only a malformed `method_arn` is an error; every credential problem
    /// yields [`AuthorizationDecision::Unauthorized`].
    pub fn authorize_header(
        &self,
        header: Option<&[u8]>,
        method_arn: &str,
    ) -> Result<AuthorizationDecision, AuthorizerError> {
        let Some(header) = header.filter(|h| !h.is_empty()) else {
            warn!(
                event = "Authorize",
                phase = "Header",
                reason = "authorization header not given"
            );
            return Ok(AuthorizationDecision::Unauthorized);
        };

        let credential = match Credential::decode(header) {
            Ok(credential) => credential,
            Err(err) => {
                warn!(event = "Authorize", phase = "Decode", error = err.to_string());
                return Ok(AuthorizationDecision::Unauthorized);
            }
        };

        if !credential.matches(&self.expected) {
            warn!(
                event = "Authorize",
                phase = "Credentials",
                reason = "credential mismatch"
            );
            return Ok(AuthorizationDecision::Unauthorized);
        }

        debug!(event = "Authorize", phase = "MethodArn", method_arn = method_arn);
        let reference = ResourceReference::from_str(method_arn)?;

        // api-id/stage/VERB/path: the api id is the resource type, the stage
        // the resource.
        let mut builder = PolicyBuilder::new(PRINCIPAL_ID, reference.account_id())
            .with_api_id(reference.resource_type().unwrap_or(WILDCARD))
            .with_stage(reference.resource().unwrap_or(WILDCARD));
        builder.allow_all()?;
        let document = builder.build()?;

        info!(
            event = "Authorize",
            phase = "Result",
            account_id = reference.account_id(),
            decision = "Allow"
        );

        Ok(AuthorizationDecision::Allow(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Effect;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use std::sync::{Arc, Mutex, OnceLock};
    use yare::parameterized;

    const METHOD_ARN: &str = "arn:aws:execute-api:us-east-1:123456789012:abcde/prod/GET/items";

    fn authorizer() -> Authorizer {
        Authorizer::new(Credential::new("alice", "s3cr3t"))
    }

    fn basic(pair: &str) -> String {
        format!("Basic {}", STANDARD.encode(pair))
    }

    #[test]
    fn test_valid_credentials_allow_all_methods() {
        let request =
            AuthorizerRequest::new(METHOD_ARN).with_header("Authorization", basic("alice:s3cr3t"));
        let decision = authorizer().authorize(&request).unwrap();

        let document = decision.policy().expect("expected an Allow decision");
        assert_eq!(document.principal_id, "*");
        assert_eq!(document.statements().len(), 1);
        assert_eq!(document.statements()[0].effect, Effect::Allow);
        assert_eq!(
            document.statements()[0].resources,
            ["arn:aws:execute-api:*:123456789012:abcde/prod/*/*"]
        );
    }

    #[test]
    fn test_percent_encoded_password_matches() {
        let authorizer = Authorizer::new(Credential::new("alice", "p@ss"));
        let header = basic("alice:p%40ss");
        let decision = authorizer
            .authorize_header(Some(header.as_bytes()), METHOD_ARN)
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[parameterized(
        wrong_password = { Some(basic("alice:wrong")) },
        wrong_username = { Some(basic("bob:s3cr3t")) },
        wrong_scheme = { Some("Bearer xyz".to_string()) },
        not_base64 = { Some("Basic %%%".to_string()) },
        no_separator = { Some(basic("alices3cr3t")) },
        empty_header = { Some(String::new()) },
        missing_header = { None },
    )]
    fn test_unauthorized(header: Option<String>) {
        let decision = authorizer()
            .authorize_header(header.as_deref().map(str::as_bytes), METHOD_ARN)
            .unwrap();
        assert_eq!(decision, AuthorizationDecision::Unauthorized);
        assert_eq!(decision.to_string(), "Unauthorized");
    }

    #[test]
    fn test_unauthorized_skips_method_arn_parsing() {
        let header = basic("alice:wrong");
        let decision = authorizer()
            .authorize_header(Some(header.as_bytes()), "not-an-arn")
            .unwrap();
        assert_eq!(decision, AuthorizationDecision::Unauthorized);
    }

    #[test]
    fn test_malformed_method_arn_propagates() {
        let header = basic("alice:s3cr3t");
        let result = authorizer().authorize_header(Some(header.as_bytes()), "arn:aws:execute-api");
        assert!(matches!(
            result,
            Err(AuthorizerError::MalformedReference(_))
        ));
    }

    #[test]
    fn test_method_arn_without_api_id_uses_wildcards() {
        let header = basic("alice:s3cr3t");
        let decision = authorizer()
            .authorize_header(
                Some(header.as_bytes()),
                "arn:aws:execute-api:us-east-1:123456789012:abcde",
            )
            .unwrap();
        let document = decision.policy().unwrap();
        assert_eq!(
            document.statements()[0].resources,
            ["arn:aws:execute-api:*:123456789012:*/abcde/*/*"]
        );
    }

    #[derive(Clone)]
    struct SharedLogBuffer(Arc<Mutex<Vec<u8>>>);

    struct SharedLogWriter(Arc<Mutex<Vec<u8>>>);

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedLogBuffer {
        type Writer = SharedLogWriter;

        fn make_writer(&'a self) -> Self::Writer {
            SharedLogWriter(Arc::clone(&self.0))
        }
    }

    impl std::io::Write for SharedLogWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_logs_never_contain_credentials() {
        static LOG_SINK: OnceLock<SharedLogBuffer> = OnceLock::new();
        let sink = LOG_SINK
            .get_or_init(|| {
                let sink = SharedLogBuffer(Arc::new(Mutex::new(Vec::new())));
                let subscriber = tracing_subscriber::fmt()
                    .with_ansi(false)
                    .without_time()
                    .with_target(false)
                    .with_max_level(tracing::Level::DEBUG)
                    .with_writer(sink.clone())
                    .finish();
                tracing::subscriber::set_global_default(subscriber)
                    .expect("global test subscriber should initialize");
                tracing::callsite::rebuild_interest_cache();
                sink
            })
            .clone();

        let authorizer = Authorizer::new(Credential::new("carol", "hunter2-secret"));
        let good = basic("carol:hunter2-secret");
        let bad = basic("carol:hunter3-secret");
        let swapped = basic("hunter4-typed-as-user:x");
        for header in [&good, &bad, &swapped] {
            authorizer
                .authorize_header(Some(header.as_bytes()), METHOD_ARN)
                .unwrap();
        }

        let logs = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(
            logs.contains("credential mismatch"),
            "expected mismatch log event, logs: {logs}"
        );
        assert!(!logs.contains("carol"), "username leaked into logs: {logs}");
        assert!(!logs.contains("hunter4-typed-as-user"));
        assert!(!logs.contains("hunter2-secret"));
        assert!(!logs.contains("hunter3-secret"));
        assert!(!logs.contains(&good));
    }
}
