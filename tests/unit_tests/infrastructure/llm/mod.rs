mod mock_transformer_test;
