use clap::ValueEnum;
use graph_data::Split;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SplitChoice {
    Train,
    Val,
    Test,
    All,
}

impl From<SplitChoice> for Split {
    fn from(choice: SplitChoice) -> Self {
        match choice {
            SplitChoice::Train => Split::Train,
            SplitChoice::Val => Split::Val,
            SplitChoice::Test => Split::Test,
            SplitChoice::All => Split::All,
        }
    }
}
