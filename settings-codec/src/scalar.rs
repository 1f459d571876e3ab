//! Boolean, text, and string-list codecs.

use crate::{Codec, CodecError, CodecResult, SettingValue};

/// Boolean codec accepting the usual spellings of true and false.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bool;

impl Codec for Bool {
    type Value = bool;

    fn type_name(&self) -> &'static str {
        "bool"
    }

    fn parse(&self, input: &str) -> CodecResult<bool> {
        match input {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(CodecError::decode(
                input,
                "bool",
                "expected one of 1, t, true, 0, f, false",
            )),
        }
    }

    fn format(&self, value: &bool) -> String {
        value.to_string()
    }
}

impl SettingValue for bool {
    type Codec = Bool;
}

/// Identity codec for free-form strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Text;

impl Codec for Text {
    type Value = String;

    fn type_name(&self) -> &'static str {
        "string"
    }

    fn parse(&self, input: &str) -> CodecResult<String> {
        Ok(input.to_owned())
    }

    fn format(&self, value: &String) -> String {
        value.clone()
    }
}

impl SettingValue for String {
    type Codec = Text;
}

/// Comma-separated list of strings. The empty string is the empty list.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringList;

impl Codec for StringList {
    type Value = Vec<String>;

    fn type_name(&self) -> &'static str {
        "string list"
    }

    fn parse(&self, input: &str) -> CodecResult<Vec<String>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        Ok(input.split(',').map(str::to_owned).collect())
    }

    fn format(&self, value: &Vec<String>) -> String {
        value.join(",")
    }
}

impl SettingValue for Vec<String> {
    type Codec = StringList;
}
