// Template tokens - placeholder substitution over brand template details
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    EntityPrefix,
    /// Value of the strategy the brand declares in `config.serviceid`
    ServiceId,
    DeviceId,
    Entity,
    State,
    Attribute,
}

impl Token {
    pub const ALL: [Token; 6] = [
        Token::EntityPrefix,
        Token::ServiceId,
        Token::DeviceId,
        Token::Entity,
        Token::State,
        Token::Attribute,
    ];

    pub fn placeholder(self) -> &'static str {
        match self {
            Token::EntityPrefix => "#ENTITYPREFIX#",
            Token::ServiceId => "#SERVICEID#",
            Token::DeviceId => "#SERVICEID_DEVICE#",
            Token::Entity => "#SERVICEID_ENTITY#",
            Token::State => "#SERVICEID_STATE#",
            Token::Attribute => "#SERVICEID_ATTR#",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.placeholder())
    }
}

/// Values derived for one template application. Tokens without a value
/// could not be derived for the selected entity.
#[derive(Debug, Clone, Default)]
pub struct TokenValues {
    values: HashMap<Token, String>,
}

impl TokenValues {
    pub fn set(&mut self, token: Token, value: impl Into<String>) {
        self.values.insert(token, value.into());
    }

    pub fn get(&self, token: Token) -> Option<&str> {
        self.values.get(&token).map(String::as_str)
    }
}

/// Replace every token in the string leaves of `value`.
/// Fails with the first token found that has no value.
pub fn substitute(value: &Value, tokens: &TokenValues) -> Result<Value, Token> {
    match value {
        Value::String(text) => Ok(Value::String(substitute_text(text, tokens)?)),
        Value::Array(elements) => elements
            .iter()
            .map(|element| substitute(element, tokens))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(object) => {
            let mut substituted = Map::with_capacity(object.len());
            for (key, element) in object {
                substituted.insert(key.clone(), substitute(element, tokens)?);
            }
            Ok(Value::Object(substituted))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_text(text: &str, tokens: &TokenValues) -> Result<String, Token> {
    let mut result = text.to_string();
    for token in Token::ALL {
        if !result.contains(token.placeholder()) {
            continue;
        }
        let replacement = tokens.get(token).ok_or(token)?;
        result = result.replace(token.placeholder(), replacement);
    }
    Ok(result)
}
