use request::{ChatCompletionsRequest, Content, Contents, Message, Role};
use serde_json::json;

#[test]
fn test_minimal_request_omits_unset_fields() {
    let request = ChatCompletionsRequest::builder("ai/smollm2")
        .message(Message::user("Hello! How are you?"))
        .build();

    let json = serde_json::to_value(&request).unwrap();
    println!("Minimal request JSON: {}", json);

    assert_eq!(
        json,
        json!({
            "model": "ai/smollm2",
            "messages": [{"role": "user", "content": "Hello! How are you?"}]
        })
    );
}

#[test]
fn test_request_with_sampling_options() {
    let request = ChatCompletionsRequest::builder("ai/smollm2")
        .message(Message::system("You are terse."))
        .message(Message::user("What are the benefits of using a config class?"))
        .temperature(Some(0.5))
        .max_tokens(Some(150))
        .stream(true)
        .build();

    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["model"], "ai/smollm2");
    assert_eq!(json["temperature"], 0.5);
    assert_eq!(json["max_tokens"], 150);
    assert_eq!(json["stream"], true);
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][1]["role"], "user");
}

#[test]
fn test_assistant_message_without_content() {
    let message = Message::Assistant { contents: None };
    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(json, json!({"role": "assistant"}));
}

#[test]
fn test_array_contents_deserialize() {
    let message: Message = serde_json::from_value(json!({
        "role": "user",
        "content": [
            {"type": "text", "text": "Translate 'hello world' "},
            {"type": "text", "text": "to Spanish."}
        ]
    }))
    .unwrap();

    assert_eq!(message.role(), Role::User);
    let contents = message.contents().unwrap();
    assert_eq!(
        contents,
        &Contents::Array(vec![
            Content::Text {
                text: "Translate 'hello world' ".to_string()
            },
            Content::Text {
                text: "to Spanish.".to_string()
            },
        ])
    );
}

#[test]
fn test_is_stream_defaults_to_false() {
    let request = ChatCompletionsRequest::builder("m").build();
    assert!(!request.is_stream());
    let request = ChatCompletionsRequest::builder("m").stream(true).build();
    assert!(request.is_stream());
}
