/*!
# VerifyIt API documentation

This page describes the API endpoints available on VerifyIt. All bodies are
JSON. Error responses always have the shape `{"error": "<description>"}`.

## Health

Endpoint: `/` (any method)

Always answers `200` with

```json
{"msg": "VerifyIT Flask backend is running", "status": "ok"}
```

## Search

Endpoint: `POST /search`

Example body: `{"query": "climate change facts"}`

The query is sent to the configured search provider together with the API key
and the search engine (`google` unless configured otherwise). The provider's
JSON answer is returned as is, with status `200`.

- A body without a non-empty string `query` is answered with `400` and
  `{"error": "No query provided"}`. The provider is not contacted.
- If the provider does not answer in time, the status is `504`.
- If the provider cannot be reached, answers with an error status, or answers
  with something that is not JSON, the status is `502`. For error statuses the
  provider's own explanation is included when it gave one.

## Sources

Endpoint: `POST /sources`

Example body: `{"text": "The moon landing happened in 1969 ..."}`

The first 50 words of `text` are searched for, and the first three organic
results are returned:

```json
{"sources": [{"title": "Apollo 11", "url": "https://..."}]}
```

- A body without a non-empty string `text` is answered with `400` and
  `{"error": "Missing text"}`.
- Any provider failure is answered with `500` and `{"error": "Search failed"}`.
*/
