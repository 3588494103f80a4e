use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    EmptyOwnerList = 3,
    DuplicateOwner = 4,
    InvalidConfig = 5,
    NotOwner = 6,
    InvalidAmount = 7,
    InsufficientBalance = 8,
    NotFound = 9,
    AlreadyExecuted = 10,
    AlreadyApproved = 11,
    ApprovalWindowExpired = 12,
    TimelockNotElapsed = 13,
    QuorumNotMet = 14,
    DuplicateId = 15,
    TransferFailed = 16,
    ApprovalWindowOpen = 17,
}
