use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Numeric kind used in pack-stream object headers
    pub fn pack_kind(&self) -> u8 {
        match self {
            ObjectType::Commit => 1,
            ObjectType::Tree => 2,
            ObjectType::Blob => 3,
        }
    }

    /// Parse the `<type> <size>\0` header of a serialized object
    ///
    /// Consumes the header from the reader and returns the object type
    /// together with the declared content size.
    pub fn parse_object_type(data_reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, usize)> {
        let mut object_type = Vec::new();
        data_reader.read_until(b' ', &mut object_type)?;

        let object_type = String::from_utf8(object_type)?;
        let object_type = object_type.trim();

        let mut size = Vec::new();
        data_reader.read_until(b'\0', &mut size)?;
        if size.last() != Some(&0) {
            return Err(anyhow::anyhow!("Truncated object header"));
        }
        size.pop();

        let size = String::from_utf8(size)?
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("Invalid object size in header"))?;

        Ok((ObjectType::try_from(object_type)?, size))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow::anyhow!("Invalid object type")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_type_and_declared_size() {
        let mut reader = Cursor::new(b"blob 5\0hello".to_vec());
        let (object_type, size) = ObjectType::parse_object_type(&mut reader).unwrap();

        assert_eq!(object_type, ObjectType::Blob);
        assert_eq!(size, 5);
    }

    #[test]
    fn rejects_header_without_terminator() {
        let mut reader = Cursor::new(b"blob 5".to_vec());
        assert!(ObjectType::parse_object_type(&mut reader).is_err());
    }

    #[test]
    fn pack_kind_numbering() {
        assert_eq!(ObjectType::Commit.pack_kind(), 1);
        assert_eq!(ObjectType::Tree.pack_kind(), 2);
        assert_eq!(ObjectType::Blob.pack_kind(), 3);
    }
}
