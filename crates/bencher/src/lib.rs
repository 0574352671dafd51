#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    delivery: Delivery,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, delivery: Delivery, file: TestFile) -> Self {
        Self { name, delivery, file }
    }

    /// The whole request arrives in one read.
    pub fn one_shot(name: &'static str, file: TestFile) -> Self {
        Self::new(name, Delivery::OneShot, file)
    }

    /// The request arrives in reads of `size` bytes.
    pub fn fragmented(name: &'static str, size: usize, file: TestFile) -> Self {
        Self::new(name, Delivery::Fragmented(size), file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    /// The request split into the reads a connection would see.
    pub fn reads(&self) -> Vec<&'static [u8]> {
        let content = self.file.content().as_bytes();
        match self.delivery {
            Delivery::OneShot => vec![content],
            Delivery::Fragmented(size) => content.chunks(size.max(1)).collect(),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Delivery {
    OneShot,
    Fragmented(usize),
}
