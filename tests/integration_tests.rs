//! Integration tests for the chat completions client.
//! The live test requires an API key in the environment to run; the others
//! talk to a one-shot HTTP server on localhost.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use chatterm::{ChatCompletion, Message, OpenAi};

    /// Serves one request with `status` and `body`, returning the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (base_url, handle)
    }

    fn client(base_url: String) -> OpenAi {
        OpenAi::with_options(
            Some("sk-test".to_string()),
            Some(base_url),
            Some(Duration::from_secs(10)),
        )
        .expect("Failed to create client")
    }

    #[tokio::test]
    async fn test_completion_against_local_server() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"id":"chatcmpl-1","model":"gpt-x","choices":[{"index":0,"message":{"role":"assistant","content":"4"},"finish_reason":"stop"}]}"#,
        )
        .await;

        let reply = client(base_url)
            .complete(
                "gpt-x",
                &[Message::system("be terse"), Message::user("2+2")],
            )
            .await
            .unwrap();
        assert_eq!(reply, "4");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions "));
        assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
        assert!(request.contains(
            r#"{"model":"gpt-x","messages":[{"role":"system","content":"be terse"},{"role":"user","content":"2+2"}]}"#
        ));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_error() {
        let (base_url, server) = serve_once(
            "401 Unauthorized",
            r#"{"error":{"type":"invalid_request_error","message":"Incorrect API key provided"}}"#,
        )
        .await;

        let err = client(base_url)
            .complete("gpt-x", &[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("Incorrect API key provided"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"id":"x","model":"gpt-x","choices":[]}"#).await;

        let err = client(base_url)
            .complete("gpt-x", &[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no choices"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_simple_completion_request() {
        // This test requires OPENAI_API_KEY and CHATTERM_TEST_MODEL to be set
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        let model = std::env::var("CHATTERM_TEST_MODEL").ok();
        let (Some(api_key), Some(model)) = (api_key, model) else {
            eprintln!("Skipping test: OPENAI_API_KEY or CHATTERM_TEST_MODEL not set");
            return;
        };

        let client = OpenAi::new(Some(api_key)).expect("Failed to create client");
        let response = client
            .complete(&model, &[Message::user("Say 'test passed'")])
            .await;
        assert!(
            response.is_ok(),
            "Request should succeed with valid API key"
        );
    }
}
