//! Generated bindings for the gateway contract.

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract Gateway {
        /// One BTC-to-EVM mint awaiting committee attestation.
        struct IncomingInvoiceResponse {
            uint256 invoiceId;
            string utxo;
            uint256 amount;
            address recipient;
            uint8 status;
            address[] validators;
            bool[] confirmations;
        }

        /// One EVM-to-BTC payout destination.
        struct OutgoingInvoiceResponse {
            uint256 invoiceId;
            string recipient;
            uint256 amount;
            uint8 status;
        }

        /// A withdrawal batch together with its proposed BTC redemption
        /// transaction, serialized and hex encoded.
        struct OutgoingTxResponse {
            uint256 id;
            uint256[] invoiceIds;
            string txContent;
            uint8 status;
        }

        /// Per-operator verification cursors.
        struct ValidatorInfo {
            uint256 nextIncomingInvoice;
            uint256 nextOutgoingInvoice;
        }

        function allValidators() external view returns (address[] memory);
        function validator(address operator) external view returns (ValidatorInfo memory);

        function incomingInvoicesCount() external view returns (uint256);
        function outgoingInvoicesCount() external view returns (uint256);
        function outgoingTxCount() external view returns (uint256);

        function incomingInvoice(string calldata invoiceId) external view returns (IncomingInvoiceResponse memory);
        function outgoingInvoice(uint256 invoiceId) external view returns (OutgoingInvoiceResponse memory);
        function outgoingTx(uint256 id) external view returns (OutgoingTxResponse memory);

        function verifyIncomingInvoice(uint256 invoiceId, string calldata utxo, uint256 amount, address recipient, bool isVerified) external;
        function verifyOutgoingTx(uint256 id, bool isVerified, string calldata signature) external;
    }
}
