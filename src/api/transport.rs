//! The transport contract consumed by the session client.
//!
//! A transport knows how to invoke a named remote procedure with an ordered
//! list of arguments. It knows nothing about sessions: the client prepends the
//! token before the arguments ever reach it.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A failure raised by a transport while invoking a remote procedure.
#[derive(Debug, Error)]
pub enum TransportFault {
    /// The request never completed (connection refused, timeout, TLS...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status and no fault body.
    #[error("HTTP {status}: {body}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The raw response body, possibly empty.
        body: String,
    },

    /// The response could not be understood.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The remote procedure raised an exception.
    #[error("Remote fault {code}: {message}")]
    Remote {
        /// The fault code reported by the server.
        code: i64,
        /// The fault message reported by the server.
        message: String,
    },
}

impl TransportFault {
    /// Create a malformed-response fault.
    pub fn malformed(msg: impl Into<String>) -> Self {
        TransportFault::Malformed(msg.into())
    }

    /// Create a remote fault.
    pub fn remote(code: i64, message: impl Into<String>) -> Self {
        TransportFault::Remote {
            code,
            message: message.into(),
        }
    }

    /// Check if the fault looks like a rejected or expired session.
    ///
    /// The RPC plugin reports these as `RemoteAuthenticationException`, or as
    /// HTTP 401 when the gateway rejects the request first.
    pub fn is_auth_fault(&self) -> bool {
        match self {
            TransportFault::Remote { message, .. } => {
                message.contains("RemoteAuthenticationException")
            }
            TransportFault::Http { status, .. } => *status == 401,
            _ => false,
        }
    }
}

/// Something that can invoke a named remote procedure.
///
/// Implementations return the procedure's raw result untouched, or a
/// [`TransportFault`]. They must not retry on their own.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invoke `procedure` with `args` in order.
    async fn invoke(&self, procedure: &str, args: Vec<Value>) -> Result<Value, TransportFault>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn invoke(&self, procedure: &str, args: Vec<Value>) -> Result<Value, TransportFault> {
        (**self).invoke(procedure, args).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn invoke(&self, procedure: &str, args: Vec<Value>) -> Result<Value, TransportFault> {
        (**self).invoke(procedure, args).await
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! A scripted in-memory transport for client tests.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// One recorded call.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Invocation {
        pub procedure: String,
        pub args: Vec<Value>,
    }

    #[derive(Default)]
    struct State {
        calls: Vec<Invocation>,
        replies: VecDeque<Result<Value, TransportFault>>,
    }

    /// Records every invocation and replays queued replies in order.
    ///
    /// Cloning shares the same script, so a test can keep a handle after
    /// handing the transport to a client. An empty queue answers `null`.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        state: Arc<Mutex<State>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(&self, value: Value) -> &Self {
            self.state.lock().unwrap().replies.push_back(Ok(value));
            self
        }

        pub fn fail(&self, fault: TransportFault) -> &Self {
            self.state.lock().unwrap().replies.push_back(Err(fault));
            self
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.state.lock().unwrap().calls.clone()
        }

        pub fn last_call(&self) -> Invocation {
            self.calls().pop().expect("no calls recorded")
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn invoke(
            &self,
            procedure: &str,
            args: Vec<Value>,
        ) -> Result<Value, TransportFault> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Invocation {
                procedure: procedure.to_string(),
                args,
            });
            state.replies.pop_front().unwrap_or(Ok(Value::Null))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_auth_fault_detected() {
        let fault = TransportFault::remote(
            0,
            "com.atlassian.jira.rpc.exception.RemoteAuthenticationException: Invalid username or password.",
        );
        assert!(fault.is_auth_fault());
    }

    #[test]
    fn test_http_401_is_auth_fault() {
        let fault = TransportFault::Http {
            status: 401,
            body: String::new(),
        };
        assert!(fault.is_auth_fault());
    }

    #[test]
    fn test_other_faults_are_not_auth_faults() {
        assert!(!TransportFault::malformed("garbage").is_auth_fault());
        assert!(!TransportFault::remote(500, "RemotePermissionException").is_auth_fault());
    }

    #[test]
    fn test_fault_display() {
        assert_eq!(
            TransportFault::remote(42, "boom").to_string(),
            "Remote fault 42: boom"
        );
        assert_eq!(
            TransportFault::malformed("not json").to_string(),
            "Malformed response: not json"
        );
    }

    #[tokio::test]
    async fn test_boxed_transport_delegates() {
        let mock = mock::MockTransport::new();
        mock.reply(Value::from(7));
        let boxed: Box<dyn Transport> = Box::new(mock.clone());

        let value = boxed.invoke("ping", vec![Value::from("x")]).await.unwrap();

        assert_eq!(value, Value::from(7));
        assert_eq!(mock.last_call().procedure, "ping");
    }
}
