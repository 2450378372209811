//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse files or single strings, as well as lazy parsing via a
//! [NewickIterator].

use crate::model::{BranchLength, Tree, VertexIndex};
use crate::newick::defs::{DEFAULT_NUM_LEAVES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;
use log::{debug, trace};

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for single/multiple Newick format trees.
///
/// Vertices of any arity are accepted; whether a tree is bifurcating is
/// checked by its consumers (see [Basis](crate::basis::Basis)).
///
/// # Configuration
/// * [`with_num_leaves(num_leaves)`](Self::with_num_leaves)
///     - Can be configured with number of leaves in trees to parse,
///       otherwise it is inferred from the first parsed tree and then stored.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse single tree
/// * [`parse_all`](Self::parse_all) - Parse all trees eagerly
/// * [`into_iter`](Self::into_iter) - Parse trees lazily
///
/// # Example
/// ```
/// use phylobasis::newick::NewickParser;
/// use phylobasis::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((b,c)a,d)root;");
/// let tree = NewickParser::new().parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// assert_eq!(tree.root().label(), Some("root"));
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    know_num_leaves: bool,
    num_leaves: usize,
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser] with default settings:
    /// number of leaves is unknown and will be counted during parsing.
    pub fn new() -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
        }
    }

    /// Sets the expected number of leaves in each parsed tree.
    ///
    /// This allows pre-allocation of the vertex arena.
    /// If not set, the parser will count leaves of the first tree.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
        self
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Consumes the parser and returns an iterator over trees from the byte source.
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser with underlying source containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    pub fn into_iter<B: ByteSource>(self, byte_parser: ByteParser<B>) -> NewickIterator<B> {
        NewickIterator {
            byte_parser,
            parser: self,
            done: false,
        }
    }

    /// Parses all Newick trees from the byte source until EOF.
    ///
    /// # Returns
    /// * `Ok(Vec<Tree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all<B: ByteSource>(
        &mut self,
        mut byte_parser: ByteParser<B>,
    ) -> Result<Vec<Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut byte_parser)?);
        }
        debug!("parsed {} newick trees", trees.len());
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick tree string
    ///
    /// # Returns
    /// * `Ok(Tree)` - The parsed tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse_str<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Tree, ParsingError> {
        let mut tree = Tree::new(self.num_leaves);

        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }

        let root_index = self.parse_vertex(parser, &mut tree)?;

        // Consume the terminating semicolon
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        tree.set_root(root_index);

        // Having parsed a full tree, the number of leaves in a tree is now known
        if !self.know_num_leaves {
            self.num_leaves = tree.num_leaves();
            self.know_num_leaves = true;
        }

        trace!(
            "parsed tree with {} leaves and {} internal vertices",
            tree.num_leaves(),
            tree.num_internal()
        );

        Ok(tree)
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses a vertex (either internal vertex or leaf) and returns its index.
    ///
    /// Non-recursive: `open` holds the child lists of all internal vertices
    /// whose `(` has been read but whose `)` has not.
    /// - `(child[,child]*)[label][:branch_length]` for internal vertices
    /// - `label[:branch_length]` for leaves
    fn parse_vertex<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        let mut open: Vec<Vec<VertexIndex>> = Vec::new();

        loop {
            // Descend through opening parentheses down to the next leaf
            parser.skip_comment_and_whitespace()?;
            if parser.consume_if(b'(') {
                open.push(Vec::with_capacity(2));
                continue;
            }
            let mut index = self.parse_leaf(parser, tree)?;

            // Attach to the enclosing vertex, closing every vertex that ends here
            loop {
                let Some(mut children) = open.pop() else {
                    return Ok(index);
                };
                children.push(index);

                parser.skip_comment_and_whitespace()?;
                if parser.consume_if(b',') {
                    open.push(children);
                    break;
                }
                if parser.consume_if(b')') {
                    let label = self.parse_internal_label(parser)?;
                    let branch_length = self.parse_branch_length(parser)?;
                    index = tree.add_internal(children, label, branch_length);
                    continue;
                }
                if parser.is_eof() {
                    return Err(ParsingError::unexpected_eof(parser));
                }
                let next_char = parser.peek().map(char::from);
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    format!("Expected ',' or ')' after child but found {:?}", next_char),
                ));
            }
        }
    }

    /// Parses the optional name of an internal vertex following its `)`.
    fn parse_internal_label<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<String>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        match parser.peek() {
            None => Ok(None),
            Some(b) if NEWICK_LABEL_DELIMITERS.contains(&b) => Ok(None),
            Some(_) => {
                let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
                Ok(Some(label).filter(|l| !l.is_empty()))
            }
        }
    }

    /// Parses leaf vertex and adds it to tree:
    /// - `label[:branch_length]`, where the label may be empty
    fn parse_leaf<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        let branch_length = self.parse_branch_length(parser)?;

        Ok(tree.add_leaf(label, branch_length))
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - `Ok(Some(branch_length))` if found a branch length and was able to parse it
    /// - `Ok(None)` if no branch length found
    /// - [ParsingError] if the value is not a non-negative finite number
    fn parse_branch_length<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<BranchLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                branch_length_str.push(b as char);
                parser.next_byte();
            } else {
                break;
            }
        }

        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Invalid branch length: {:?}", branch_length_str),
            )
        })?;

        BranchLength::try_new(value).map(Some).ok_or_else(|| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Branch length must be non-negative and finite: {}", value),
            )
        })
    }
}

// =#========================================================================#=
// NEWICK ITERATOR (lazy parser)
// =#========================================================================$=
/// Iterator to parse Newick trees.
///
/// Created by [NewickParser::into_iter()].
/// Yields `Result<Tree, ParsingError>` for each tree and stops after the
/// first error.
pub struct NewickIterator<B: ByteSource> {
    parser: NewickParser,
    byte_parser: ByteParser<B>,
    done: bool,
}

impl<B: ByteSource> Iterator for NewickIterator<B> {
    type Item = Result<Tree, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Err(e) = self.byte_parser.skip_comment_and_whitespace() {
            self.done = true;
            return Some(Err(e));
        }
        if self.byte_parser.is_eof() {
            self.done = true;
            return None;
        }

        let result = self.parser.parse_str(&mut self.byte_parser);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
