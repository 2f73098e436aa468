//! Character trie for route autocomplete.

/// Lowercase one `char` at a time.
///
/// Unlike [`str::to_lowercase`], the result for a character never depends
/// on what follows it (Greek capital sigma becomes `σ` even at the end of
/// the string), so the normal form of a prefix is always a prefix of the
/// normal form of the word.
pub(crate) fn normalize(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// One trie node. Children keep the order in which their characters were
/// first inserted.
#[derive(Debug, Default)]
struct TrieNode {
    children: Vec<(char, TrieNode)>,
    is_end_of_word: bool,
}

impl TrieNode {
    fn child(&self, ch: char) -> Option<&TrieNode> {
        self.children
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, node)| node)
    }

    fn child_or_insert(&mut self, ch: char) -> &mut TrieNode {
        let idx = match self.children.iter().position(|(c, _)| *c == ch) {
            Some(idx) => idx,
            None => {
                self.children.push((ch, TrieNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[idx].1
    }

    fn collect(&self, buffer: &mut String, out: &mut Vec<String>) {
        if self.is_end_of_word {
            out.push(buffer.clone());
        }
        for (ch, child) in &self.children {
            buffer.push(*ch);
            child.collect(buffer, out);
            buffer.pop();
        }
    }
}

/// Trie over lowercased route strings.
///
/// Words are lowercased character by character on the way in, and so are
/// prefixes on the way in to [`RouteTrie::search`]; results come back
/// lowercased. Characters are Unicode scalar values.
#[derive(Debug, Default)]
pub struct RouteTrie {
    root: TrieNode,
    len: usize,
}

impl RouteTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word. Inserting a word that is already present is a no-op.
    pub fn insert(&mut self, word: &str) {
        let mut current = &mut self.root;
        for ch in normalize(word).chars() {
            current = current.child_or_insert(ch);
        }
        if !current.is_end_of_word {
            current.is_end_of_word = true;
            self.len += 1;
        }
    }

    /// Every stored word starting with `prefix`, compared case-insensitively.
    ///
    /// Returns an empty vector when no stored word has the prefix; an
    /// empty prefix returns every word. Words are listed depth-first with
    /// siblings in first-insertion order.
    pub fn search(&self, prefix: &str) -> Vec<String> {
        let prefix = normalize(prefix);
        let Some(node) = self.find(&prefix) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut buffer = prefix;
        node.collect(&mut buffer, &mut out);
        out
    }

    /// Whether `word` was inserted, compared case-insensitively.
    pub fn contains(&self, word: &str) -> bool {
        self.find(&normalize(word))
            .is_some_and(|node| node.is_end_of_word)
    }

    /// Number of distinct stored words.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no word has been inserted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn find(&self, normalized: &str) -> Option<&TrieNode> {
        normalized
            .chars()
            .try_fold(&self.root, |node, ch| node.child(ch))
    }
}
