/// Location of a field inside a graph document.
///
/// Used by [`ResolutionError`](crate::ResolutionError),
/// [`Violation`](crate::Violation) and [`Mismatch`](crate::Mismatch)
/// to name the offending deme, epoch or field.
///
/// # Examples
///
/// ```
/// let path = demes_resolver::FieldPath::deme("A").field("epochs").index(1).field("end_size");
/// assert_eq!(path.to_string(), "demes[A].epochs[1].end_size");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<Segment>);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Segment {
    Field(String),
    Index(usize),
    Name(String),
}

impl FieldPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path to the deme called `name`.
    pub fn deme<N: AsRef<str>>(name: N) -> Self {
        Self::root().field("demes").name(name)
    }

    /// Append a mapping key.
    pub fn field<N: AsRef<str>>(mut self, field: N) -> Self {
        self.0.push(Segment::Field(field.as_ref().to_owned()));
        self
    }

    /// Append a list index.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    /// Append a named element of a list, such as a deme.
    pub fn name<N: AsRef<str>>(mut self, name: N) -> Self {
        self.0.push(Segment::Name(name.as_ref().to_owned()));
        self
    }

    /// `true` for the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(field) if i == 0 => write!(f, "{field}")?,
                Segment::Field(field) => write!(f, ".{field}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Name(name) => write!(f, "[{name}]")?,
            }
        }
        Ok(())
    }
}
