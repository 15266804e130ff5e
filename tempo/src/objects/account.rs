/// An account whose balance is only reachable through its methods.
///
/// The balance always equals the opening amount plus every deposit minus
/// every withdrawal. Withdrawals are not checked against the balance, so
/// it may go negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankAccount {
    balance: i64,
}

impl BankAccount {
    pub fn new(initial: i64) -> Self {
        Self { balance: initial }
    }

    pub fn deposit(&mut self, amount: i64) {
        self.balance += amount;
    }

    pub fn withdraw(&mut self, amount: i64) {
        self.balance -= amount;
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }
}
