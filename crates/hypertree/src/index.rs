macro_rules! make_id {
    ($(#[$attr:meta])* $vis:vis $name:ident) => {
        $(#[$attr])*
        #[derive(
            Copy,
            Clone,
            Debug,
            Hash,
            Eq,
            PartialEq,
            Ord,
            PartialOrd,
        )]
        $vis struct $name(u32);

        impl $name {
            /// Create a new identifier.
            #[inline(always)]
            pub const fn new(x: u32) -> Self {
                Self(x)
            }

            /// Returns the identifier as `u32`.
            #[inline(always)]
            pub const fn get(&self) -> u32 {
                self.0
            }

            /// Returns the identifier as `usize`.
            #[inline(always)]
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl ::std::convert::From<u32> for $name {
            #[inline(always)]
            fn from(x: u32) -> Self {
                Self(x)
            }
        }

        impl ::std::convert::From<$name> for u32 {
            #[inline(always)]
            fn from(x: $name) -> Self {
                x.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

make_id!(
    /// A vertex of a hypergraph. Vertices are positive integers assigned by the parser.
    pub Vertex
);

make_id!(
    /// The name of a hyperedge. Subedges keep the name of the edge they were cut from.
    pub EdgeName
);

#[cfg(test)]
mod test {
    use super::{EdgeName, Vertex};

    #[test]
    fn make_id() {
        let v = Vertex::new(42);

        assert_eq!(v.get(), 42);
        assert_eq!(v.index(), 42);
        assert_eq!(Vertex::from(42_u32), v);
        assert_eq!(u32::from(v), 42_u32);
        assert_eq!(format!("{:?}", v), "Vertex(42)".to_string());
        assert_eq!(format!("{}", v), "42".to_string());
        assert!(Vertex::new(1) < Vertex::new(2));
        assert_eq!(format!("{:?}", EdgeName::new(7)), "EdgeName(7)".to_string());
    }
}
