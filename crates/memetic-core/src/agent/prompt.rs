//! Prompt rendering from catalog personas.
//!
//! System prompts are always built from the durable [`PersonaProfile`],
//! never from the volatile agent directory.

use memetic_types::agent::PersonaProfile;

/// Render the chat system prompt for a persona.
pub fn system_prompt(profile: &PersonaProfile) -> String {
    format!(
        "You are {name}, a meme agent with the following characteristics:\n\
         - Description: {description}\n\
         - Personality: {personality}\n\
         - Token: {token_name} ({token_symbol})\n\
         \n\
         Respond in a way that matches your personality and characteristics.",
        name = profile.name,
        description = profile.description,
        personality = profile.personality,
        token_name = profile.token_name,
        token_symbol = profile.token_symbol,
    )
}

/// Style an image prompt with the persona's character.
pub fn image_prompt(profile: &PersonaProfile, prompt: &str) -> String {
    format!(
        "Create an image in the style of {}, who is {}. {}",
        profile.name, profile.personality, prompt
    )
}

/// The reply text recorded on an image-producing exchange.
pub fn image_exchange_reply(prompt: &str) -> String {
    format!("Generated image with prompt: {prompt}")
}
