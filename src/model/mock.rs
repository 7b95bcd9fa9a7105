use async_trait::async_trait;

use super::{ModelProvider, ModelRequest};
use crate::types::ChatRole;

#[derive(Debug, Default)]
pub struct MockModelProvider;

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn complete(&self, request: ModelRequest) -> anyhow::Result<String> {
        let last_user = request
            .turns
            .iter()
            .rev()
            .find(|turn| turn.role == ChatRole::User)
            .map(|turn| turn.content.as_str())
            .ok_or_else(|| anyhow::anyhow!("mock provider needs a user turn"))?;

        Ok(canned_reply(last_user))
    }
}

fn canned_reply(input: &str) -> String {
    let lowered = input.to_lowercase();

    if let Some(degrees) = extract_temperature(&lowered) {
        return format!("Setting temperature to {degrees}°F.");
    }
    if lowered.contains("light") {
        if lowered.contains("off") {
            return "Turning the lights off.".to_owned();
        }
        return "Turning the lights on.".to_owned();
    }
    if lowered.contains("disarm") {
        return "Disarming the security system.".to_owned();
    }
    if lowered.contains("arm") || lowered.contains("security") {
        return "The security system is armed. The kitchen window sensor is inactive.".to_owned();
    }
    if lowered.contains("energy") || lowered.contains("usage") {
        return "You have used 23.5 kWh today; HVAC is the largest consumer at 8.2 kWh."
            .to_owned();
    }

    format!("(mock) I heard: {input}")
}

fn extract_temperature(lowered: &str) -> Option<u32> {
    let index = lowered.find("temperature to ")?;
    let digits = lowered[index + "temperature to ".len()..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();
    digits.parse().ok()
}
