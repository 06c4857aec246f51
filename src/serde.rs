use crate::Mode;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

impl Serialize for Mode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_test::{Token, assert_de_tokens, assert_tokens};

    #[test]
    fn write_create() {
        assert_tokens(&Mode::WriteCreate, &[Token::String("write-create")]);
    }

    #[test]
    fn read() {
        assert_tokens(&Mode::Read, &[Token::String("read")]);
    }

    #[test]
    fn short_spellings() {
        assert_de_tokens(&Mode::WriteCreate, &[Token::String("w+")]);
        assert_de_tokens(&Mode::Read, &[Token::String("r")]);
    }
}
