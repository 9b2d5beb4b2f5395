use hypertree::{Edge, EdgeName, EdgeSet, Graph, Names, Vertex};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadHyperBenchError {
    #[error("unexpected {found} in line {line} (expected {expected})")]
    Unexpected { line: usize, expected: &'static str, found: String },
    #[error("unexpected end of input (expected {0})")]
    UnexpectedEnd(&'static str),
    #[error("duplicate edge name {0}")]
    DuplicateEdge(String),
    #[error("input continues after the final '.' in line {0}")]
    TrailingInput(usize),
    #[error("io error")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Token<'a> {
    Name(&'a str),
    Open,
    Close,
    Comma,
    Dot,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Name(name) => write!(f, "name '{name}'"),
            Token::Open => f.write_str("'('"),
            Token::Close => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
            Token::Dot => f.write_str("'.'"),
        }
    }
}

/// Split the input into tokens tagged with their line number. Lines starting with '%'
/// are skipped.
fn tokenize(input: &str) -> Vec<(usize, Token<'_>)> {
    let mut tokens = vec![];
    for (i, line) in input.lines().enumerate() {
        if line.trim_start().starts_with('%') {
            continue;
        }
        let mut rest = line.trim_start();
        while let Some(c) = rest.chars().next() {
            let (token, len) = match c {
                '(' => (Token::Open, 1),
                ')' => (Token::Close, 1),
                ',' => (Token::Comma, 1),
                '.' => (Token::Dot, 1),
                _ => {
                    let len = rest.find(|c: char| c.is_whitespace() || "(),.".contains(c)).unwrap_or(rest.len());
                    (Token::Name(&rest[..len]), len)
                }
            };
            tokens.push((i + 1, token));
            rest = rest[len..].trim_start();
        }
    }
    tokens
}

struct Parser<'a> {
    tokens: std::iter::Peekable<std::vec::IntoIter<(usize, Token<'a>)>>,
}

impl<'a> Parser<'a> {
    fn next(&mut self, expected: &'static str) -> Result<(usize, Token<'a>), ReadHyperBenchError> {
        self.tokens.next().ok_or(ReadHyperBenchError::UnexpectedEnd(expected))
    }

    fn name(&mut self) -> Result<&'a str, ReadHyperBenchError> {
        match self.next("a name")? {
            (_, Token::Name(name)) => Ok(name),
            (line, token) => Err(unexpected(line, "a name", token)),
        }
    }

    fn open(&mut self) -> Result<(), ReadHyperBenchError> {
        match self.next("'('")? {
            (_, Token::Open) => Ok(()),
            (line, token) => Err(unexpected(line, "'('", token)),
        }
    }
}

fn unexpected(line: usize, expected: &'static str, token: Token<'_>) -> ReadHyperBenchError {
    ReadHyperBenchError::Unexpected { line, expected, found: token.to_string() }
}

/// Parses a hypergraph in the HyperBench format.
///
/// Each edge is written as `name(v1, v2, ...)`. Edges are separated by ',' and the last
/// edge is followed by '.'. Lines starting with '%' are comments. Whitespace, including
/// line breaks, is insignificant.
///
/// Vertices and edges are numbered from 1 in the order of their first occurrence. The
/// original names are returned in the [Names] table.
pub fn parse_hyperbench(input: &str) -> Result<(Graph, Names), ReadHyperBenchError> {
    let mut parser = Parser { tokens: tokenize(input).into_iter().peekable() };
    let mut names = Names::default();
    let mut vertex_ids: HashMap<&str, u32> = HashMap::new();
    let mut edge_names = HashSet::new();
    let mut edges = vec![];

    if parser.tokens.peek().is_none() {
        return Ok((Graph::default(), names));
    }

    loop {
        let name = parser.name()?;
        if !edge_names.insert(name) {
            return Err(ReadHyperBenchError::DuplicateEdge(name.to_string()));
        }
        parser.open()?;
        let mut vertices = vec![];
        loop {
            let vertex = parser.name()?;
            let next_id = vertex_ids.len() as u32 + 1;
            let id = *vertex_ids.entry(vertex).or_insert_with(|| {
                names.insert_vertex(Vertex::new(next_id), vertex);
                next_id
            });
            vertices.push(id);
            match parser.next("',' or ')'")? {
                (_, Token::Comma) => {}
                (_, Token::Close) => break,
                (line, token) => return Err(unexpected(line, "',' or ')'", token)),
            }
        }
        let id = edges.len() as u32 + 1;
        names.insert_edge(EdgeName::new(id), name);
        edges.push(Edge::new(id, vertices));

        match parser.next("',' or '.'")? {
            (_, Token::Comma) => {}
            (_, Token::Dot) => break,
            (line, token) => return Err(unexpected(line, "',' or '.'", token)),
        }
    }

    if let Some((line, _)) = parser.tokens.next() {
        return Err(ReadHyperBenchError::TrailingInput(line));
    }
    Ok((Graph::new(EdgeSet::new(edges)), names))
}

/// Reads a hypergraph in the HyperBench format. See [parse_hyperbench].
pub fn read_hyperbench<P>(path: P) -> Result<(Graph, Names), ReadHyperBenchError>
where
    P: AsRef<Path>,
{
    let input = fs::read_to_string(path)?;
    parse_hyperbench(&input)
}

#[derive(Error, Debug)]
pub enum WriteHyperBenchError {
    #[error("io error")]
    IoError(#[from] std::io::Error),
}

/// Writes the edges of `graph` in the HyperBench format, one edge per line.
///
/// Names are taken from `names` where present. Otherwise, edges are written as `E{id}` and
/// vertices as `V{id}`. Special edges are not written.
pub fn write_hyperbench<W: Write>(out: &mut W, graph: &Graph, names: Option<&Names>) -> Result<(), WriteHyperBenchError> {
    let edges = graph.edges().edges();
    for (i, edge) in edges.iter().enumerate() {
        match names.and_then(|names| names.edge(edge.name())) {
            Some(name) => write!(out, "{name}(")?,
            None => write!(out, "E{}(", edge.name())?,
        }
        for (j, v) in edge.vertices().iter().enumerate() {
            if j > 0 {
                write!(out, ", ")?;
            }
            match names.and_then(|names| names.vertex(*v)) {
                Some(name) => write!(out, "{name}")?,
                None => write!(out, "V{v}")?,
            }
        }
        let terminator = if i + 1 == edges.len() { '.' } else { ',' };
        writeln!(out, "){terminator}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const SMALL: &str = "% a small instance
e1(a, b, c),
e2(c, d),
% a comment between edges
e3(d,
   a).
";

    fn vertex_names(graph: &Graph, names: &Names, edge: usize) -> Vec<String> {
        let edge = &graph.edges().edges()[edge];
        let mut result: Vec<_> = edge.vertices().iter().map(|v| names.vertex(*v).unwrap().to_string()).collect();
        result.sort();
        result
    }

    #[test]
    fn small_instance() {
        let (graph, names) = parse_hyperbench(SMALL).unwrap();
        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.vertices().len(), 4);
        assert_eq!(names.edge(EdgeName::new(2)), Some("e2"));
        assert_eq!(names.vertex(Vertex::new(1)), Some("a"));
        assert_eq!(names.vertex(Vertex::new(4)), Some("d"));
        assert_eq!(vertex_names(&graph, &names, 2), ["a", "d"]);
    }

    #[test]
    fn empty_input() {
        let (graph, _) = parse_hyperbench("% nothing here\n\n").unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn errors() {
        assert!(matches!(parse_hyperbench("e1(a, b)"), Err(ReadHyperBenchError::UnexpectedEnd(_))));
        assert!(matches!(parse_hyperbench("e1(a, b),"), Err(ReadHyperBenchError::UnexpectedEnd(_))));
        assert!(matches!(parse_hyperbench("e1 a, b)."), Err(ReadHyperBenchError::Unexpected { line: 1, .. })));
        assert!(matches!(parse_hyperbench("e1(a, b),\ne2()."), Err(ReadHyperBenchError::Unexpected { line: 2, .. })));
        assert!(matches!(
            parse_hyperbench("e1(a, b),\ne1(b, c)."),
            Err(ReadHyperBenchError::DuplicateEdge(name)) if name == "e1"
        ));
        assert!(matches!(parse_hyperbench("e1(a).\ne2(b)."), Err(ReadHyperBenchError::TrailingInput(2))));
    }

    #[test]
    fn write_then_read() {
        let (graph, names) = parse_hyperbench(SMALL).unwrap();
        let mut out = vec![];
        write_hyperbench(&mut out, &graph, Some(&names)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "e1(a, b, c),\ne2(c, d),\ne3(a, d).\n");

        let (graph2, names2) = parse_hyperbench(&text).unwrap();
        assert_eq!(graph2.edges().len(), graph.edges().len());
        for i in 0..graph.edges().len() {
            assert_eq!(vertex_names(&graph, &names, i), vertex_names(&graph2, &names2, i));
        }
    }

    #[test]
    fn write_without_names() {
        let graph = Graph::from_edges([(1, vec![1, 2]), (2, vec![2, 3])]);
        let mut out = vec![];
        write_hyperbench(&mut out, &graph, None).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "E1(V1, V2),\nE2(V2, V3).\n");
    }
}
