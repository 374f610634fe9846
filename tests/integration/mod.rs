/// Integration test suite: on-disk databases and the MCP protocol end to end
mod basic_integration;
mod mcp_protocol;
