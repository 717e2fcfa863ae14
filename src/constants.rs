//! Centralized constants for suggest.
//!
//! Endpoints, defaults and fixed strings live here so they can be changed in
//! one place.

/// Application name used in CLI output.
pub const APP_NAME: &str = "suggest";

/// Directory under the user's home that holds the config file.
pub const CONFIG_DIR_NAME: &str = ".suggest";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SUGGEST_CONFIG";

/// Environment variable that overrides the Ollama daemon address.
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

/// Display name used in chat when no username is configured.
pub const DEFAULT_USERNAME: &str = "User";

/// Title given to system prompts persisted as bare strings by old versions.
pub const LEGACY_PROMPT_TITLE: &str = "Legacy Prompt";

// --- Provider endpoints ---

/// OpenAI API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Groq's OpenAI-compatible API base URL.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Gemini API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Per-request timeout for every provider call.
pub const HTTP_TIMEOUT_SECS: u64 = 120;

// --- Chat ---

/// Sampling temperature for one-shot prompts.
pub const ONE_SHOT_TEMPERATURE: f32 = 0.7;

/// Sampling temperature for interactive chat.
pub const CHAT_TEMPERATURE: f32 = 0.1;

/// Inputs that end an interactive chat.
pub const EXIT_TOKENS: &[&str] = &["bye", "stop", "end"];

/// Readline history filename, stored next to the config file.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

// --- Prompt enhancement ---

/// Groq model used to rewrite prompts when `--enhance` is given.
pub const ENHANCE_MODEL: &str = "llama-3.3-70b-versatile";

/// System message for prompt enhancement. `{prompt}` is replaced with the user's text.
pub const ENHANCE_PROMPT: &str = "You are an expert in refining vague coding-related prompts. \
Your task is to take an input prompt and transform it into a clearer, more detailed, and \
structured version that improves specificity and relevance. Follow these steps:

1. **Identify missing details**: Determine what key information is lacking, such as \
programming language, frameworks, performance constraints, or specific goals.
2. **Enhance clarity**: Ensure the refined prompt is structured and unambiguous.
3. **Add specificity**: Include relevant details like libraries, performance considerations, \
or real-world use cases.
4. **Maintain original intent**: Ensure the improved prompt aligns with the user's initial question.
5. **Provide an improved version**: Output only the refined prompt.

Now, refine the following prompt:

{prompt}";

// --- Shell command suggestions ---

/// System prompt for `suggest cmd`; the reply is run verbatim by `sh -c`.
pub const COMMAND_SYSTEM_PROMPT: &str = "Return only the command to be executed as a raw string, \
no string delimiters wrapping it, no talking, no markdown, no fenced code blocks, \
what you return will be passed to a shell directly.";

/// Follow-up sent when the user asks for an explanation of the suggested command.
pub const EXPLAIN_REQUEST: &str =
    "Explain this command in detail and why it's relevant to my situation";

// --- Starter config written by `suggest init` ---

/// Model written into a freshly generated config.
pub const STARTER_MODEL: &str = "llama-3.3-70b-versatile";

/// Stock system prompts as `(title, content)`.
pub const STARTER_PROMPTS: &[(&str, &str)] = &[
    (
        "Helpful Assistant",
        "You are a helpful assistant. You provide clear, accurate, and concise responses. \
When discussing code, you use markdown formatting and include helpful comments.",
    ),
    (
        "Programming Assistant",
        "You are a programming assistant. You help write, explain, and debug code.",
    ),
    (
        "Technical Writer",
        "You are a technical writer. You help create clear documentation and explanations.",
    ),
];

/// Stock message templates as `(title, content)`.
pub const STARTER_TEMPLATES: &[(&str, &str)] = &[
    ("Code Function", "Write a [language] function that [task]"),
    ("Code Review", "Review this [language] code:\n[code]"),
];
