//! 사람이 diff 하기 쉬운 JSON 직렬화

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// 4칸 들여쓰기의 pretty JSON으로 직렬화합니다. 끝에 개행을 붙입니다.
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_four_space_indent() {
        let bytes = to_pretty_json(&serde_json::json!({ "a": [1] })).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}\n");
    }
}
